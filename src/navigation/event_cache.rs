//! # Per-event cache
//!
//! [`EventCache`] holds everything recomputed for the event on display: its hits, the per-layer
//! statistics, the valid layer set, the optional axis fit, the shower profile, and the layer hit
//! maps. It is produced in one go by [`EventCache::compute`], which runs the pipeline
//!
//! ```text
//! hits ─► aggregate_layers ─► select_valid_layers ─► fit_axis
//!     └─► shower profile, hit maps
//! ```
//!
//! and is only ever replaced wholesale by the navigation controller; no stage mutates a cache in
//! place, so a failed computation can never leave a half-updated event visible.
use smallvec::SmallVec;
use tracing::{debug, warn};

use nalgebra::Point3;

use crate::{
    axis_fit::{
        fit_axis,
        line_fit_result::{BeamLine, LineFitResult},
    },
    constants::{Energy, LayerIndex, NavIndex},
    display_params::DisplayParams,
    hits::{event_store::EventEntry, Hit},
    layers::{
        aggregate_layers,
        hit_map::{build_hit_maps, HitMap},
        shower_profile::ShowerProfile,
        validity::{select_valid_layers, ValidLayerSet},
        LayerStats,
    },
    shower_errors::ShowerError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EventCache {
    pub event_index: NavIndex,
    pub hits: Vec<Hit>,
    pub total_energy: Energy,
    pub layer_stats: Vec<LayerStats>,
    pub valid_layers: ValidLayerSet,
    pub fit: Option<LineFitResult>,
    pub profile: ShowerProfile,
    pub hit_maps: Vec<HitMap>,
}

impl EventCache {
    /// Run the full per-event recomputation.
    ///
    /// Arguments
    /// -----------------
    /// * `event_index`: Navigation index of the event.
    /// * `entry`: Hits and totals returned by the event store.
    /// * `params`: Detector description and pipeline configuration.
    ///
    /// Return
    /// ----------
    /// * `Ok(EventCache)` – a complete cache. A skipped or unconverged fit is **not** an error:
    ///   it shows up as `fit == None` or `fit.converged == false`.
    /// * `Err(ShowerError::LayerOutOfRange)` – a hit refers to a slab outside the detector.
    pub fn compute(
        event_index: NavIndex,
        entry: EventEntry,
        params: &DisplayParams,
    ) -> Result<Self, ShowerError> {
        let EventEntry {
            hits, total_energy, ..
        } = entry;

        let layer_stats = aggregate_layers(&hits, params)?;
        let valid_layers = select_valid_layers(&layer_stats, &params.validity);

        let centroids: SmallVec<[Point3<f64>; 16]> = valid_layers
            .iter()
            .filter_map(|&l| layer_stats[l].centroid_3d())
            .collect();
        for c in &centroids {
            debug!(x = c.x, y = c.y, z = c.z, "valid layer centroid");
        }

        let fit = fit_axis(&centroids, &params.fit);
        match &fit {
            None => debug!(
                valid_layers = valid_layers.len(),
                "axis fit skipped: not enough valid layers"
            ),
            Some(r) if r.converged => debug!(
                p0 = r.p0,
                p1 = r.p1,
                residual = r.residual,
                iterations = r.iterations,
                "axis fit converged"
            ),
            Some(r) => warn!(
                event = event_index,
                iterations = r.iterations,
                function_calls = r.function_calls,
                "axis fit failed to converge, no axis overlay"
            ),
        }

        let profile = ShowerProfile::from_layers(&layer_stats, &params.layer_x0);
        let hit_maps = build_hit_maps(&hits, params.n_slabs, params.hit_map);

        Ok(EventCache {
            event_index,
            hits,
            total_energy,
            layer_stats,
            valid_layers,
            fit,
            profile,
            hit_maps,
        })
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    pub fn is_valid_layer(&self, layer: LayerIndex) -> bool {
        self.valid_layers.contains(&layer)
    }

    /// Centroids of the valid layers, as entered into the fit.
    pub fn valid_centroids(&self) -> Vec<Point3<f64>> {
        self.valid_layers
            .iter()
            .filter_map(|&l| self.layer_stats[l].centroid_3d())
            .collect()
    }

    /// Axis overlay for the renderer, absent when the fit was skipped or did not converge.
    pub fn beam_line(&self, depth: f64) -> Option<BeamLine> {
        self.fit.as_ref().and_then(|f| f.beam_line(depth))
    }

    /// The recoverable fit failure of this event, if any.
    pub fn fit_error(&self) -> Option<ShowerError> {
        self.fit
            .as_ref()
            .filter(|f| !f.converged)
            .map(|f| ShowerError::FitNonConvergent {
                iterations: f.iterations,
                function_calls: f.function_calls,
            })
    }
}

#[cfg(test)]
mod event_cache_test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::axis_fit::{FitMethod, FitParams};

    /// 12 unit-energy hits placed symmetrically around `(cx, cy)`.
    fn cluster(layer: usize, cx: f64, cy: f64) -> Vec<Hit> {
        const OFFSETS: [(f64, f64); 12] = [
            (-2.0, 0.0),
            (-1.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, -2.0),
            (0.0, -1.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (-1.0, -1.0),
            (1.0, 1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
        ];
        let z = 0.5 + 15.0 * layer as f64;
        OFFSETS
            .iter()
            .map(|(dx, dy)| Hit::new(cx + dx, cy + dy, z, layer, 1.0))
            .collect()
    }

    fn entry() -> EventEntry {
        let mut hits = cluster(0, 10.0, 10.0);
        hits.extend(cluster(1, 10.0, 10.0));
        hits.extend(cluster(2, 12.0, 8.0));
        // five hits only: never valid
        hits.extend((0..5).map(|i| Hit::new(i as f64, 0.0, 45.5, 3, 1.0)));
        EventEntry::from_hits(hits)
    }

    #[test]
    fn test_pipeline() {
        let cache = EventCache::compute(7, entry(), &DisplayParams::default()).unwrap();

        assert_eq!(cache.event_index, 7);
        assert_eq!(cache.hit_count(), 41);
        assert_eq!(cache.layer_stats.len(), 15);
        assert_eq!(cache.valid_layers.as_slice(), &[0, 1, 2]);
        assert!(!cache.is_valid_layer(3));

        let fit = cache.fit.as_ref().unwrap();
        assert_relative_eq!(fit.p0, 32.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.p1, 28.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.residual, 16.0 / 3.0, epsilon = 1e-9);

        assert_relative_eq!(cache.profile.total_energy(), 41.0);
        assert_eq!(cache.hit_maps.len(), 15);
        assert!(cache.fit_error().is_none());

        let line = cache.beam_line(210.0).unwrap();
        assert_relative_eq!(line.end.z, 210.0);
    }

    #[test]
    fn test_single_valid_layer_skips_fit() {
        let entry = EventEntry::from_hits(cluster(4, 0.0, 0.0));
        let cache = EventCache::compute(0, entry, &DisplayParams::default()).unwrap();
        assert_eq!(cache.valid_layers.len(), 1);
        assert!(cache.fit.is_none());
        assert!(cache.beam_line(210.0).is_none());
        assert!(cache.fit_error().is_none());
    }

    #[test]
    fn test_non_convergent_fit_is_reported() {
        let params = DisplayParams::builder()
            .fit(
                FitParams::builder()
                    .method(FitMethod::Newton)
                    .max_iterations(1)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let cache = EventCache::compute(0, entry(), &params).unwrap();

        assert!(cache.fit.is_some());
        assert!(cache.beam_line(210.0).is_none());
        assert!(matches!(
            cache.fit_error(),
            Some(ShowerError::FitNonConvergent { iterations: 1, .. })
        ));
        // other outputs are unaffected
        assert_eq!(cache.valid_layers.len(), 3);
    }
}
