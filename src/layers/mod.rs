//! # Per-layer reduction of an event
//!
//! This module turns the flat hit list of one event into exactly `n_slabs`
//! [`LayerStats`] entries, one per slab and in slab order, so that downstream consumers can
//! index by layer without a lookup.
//!
//! For each layer it computes:
//!
//! 1. **Hit count** and **energy sum** (feeding the shower profile),
//! 2. The **energy-weighted centroid** `Σ(x·E)/ΣE`, `Σ(y·E)/ΣE` (feeding the axis fit),
//! 3. The **unweighted mean and population standard deviation** of x and y
//!    (feeding the validity filter only),
//! 4. The **depth** of the layer, either the nominal slab position or the z of the last hit seen.
//!
//! ## Undefined statistics
//!
//! * A layer whose energy sum is exactly zero has no centroid (`centroid == None`); the sum is
//!   never divided.
//! * A layer without hits carries [`SENTINEL_STAT`] in both mean and sigma of each axis.
//!
//! Modules
//! -----------------
//! * [`validity`](crate::layers::validity) – Selection of the layers trusted by the axis fit.
//! * [`shower_profile`](crate::layers::shower_profile) – Energy per layer against depth in X0.
//! * [`hit_map`](crate::layers::hit_map) – Energy-weighted 2-D hit maps per layer.
use nalgebra::{Point2, Point3};

use crate::{
    constants::{Energy, LayerIndex, Millimeter, SENTINEL_STAT},
    display_params::DisplayParams,
    hits::Hit,
    shower_errors::ShowerError,
};

pub mod hit_map;
pub mod shower_profile;
pub mod validity;

/// How the depth of a layer centroid is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthModel {
    /// z of the last hit processed in the layer; nominal position for an empty layer.
    #[default]
    LastHitZ,
    /// Fixed slab position `first_layer_z + layer × layer_pitch`.
    Nominal,
}

/// Unweighted mean and population standard deviation of one lateral coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    pub mean: Millimeter,
    pub sigma: Millimeter,
}

impl AxisStats {
    /// Statistics of a layer without hits.
    pub const SENTINEL: AxisStats = AxisStats {
        mean: SENTINEL_STAT,
        sigma: SENTINEL_STAT,
    };

    pub fn is_sentinel(&self) -> bool {
        self.mean == SENTINEL_STAT && self.sigma == SENTINEL_STAT
    }
}

/// Statistics of one slab for the current event.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStats {
    pub layer: LayerIndex,
    pub hit_count: usize,
    pub energy_sum: Energy,
    /// Energy-weighted lateral centroid, `None` when `energy_sum == 0`.
    pub centroid: Option<Point2<f64>>,
    pub depth: Millimeter,
    pub x: AxisStats,
    pub y: AxisStats,
}

impl LayerStats {
    fn empty(layer: LayerIndex, depth: Millimeter) -> Self {
        LayerStats {
            layer,
            hit_count: 0,
            energy_sum: 0.0,
            centroid: None,
            depth,
            x: AxisStats::SENTINEL,
            y: AxisStats::SENTINEL,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hit_count == 0
    }

    /// Centroid in the detector frame `(x, y, depth)`, if defined.
    pub fn centroid_3d(&self) -> Option<Point3<f64>> {
        self.centroid.map(|c| Point3::new(c.x, c.y, self.depth))
    }
}

/// Running sums of one layer during the first pass over the hits.
#[derive(Default, Clone, Copy)]
struct LayerAccumulator {
    count: usize,
    energy: f64,
    sum_x: f64,
    sum_y: f64,
    weighted_x: f64,
    weighted_y: f64,
    last_z: Option<f64>,
}

/// Nominal z of a slab.
pub fn nominal_depth(layer: LayerIndex, params: &DisplayParams) -> Millimeter {
    params.first_layer_z + layer as f64 * params.layer_pitch
}

/// Reduce the hits of one event into per-layer statistics.
///
/// Arguments
/// -----------------
/// * `hits`: The hits of the event, in storage order.
/// * `params`: Detector description (number of slabs, depth model, slab positions).
///
/// Return
/// ----------
/// * `Ok(Vec<LayerStats>)` with exactly `params.n_slabs` entries in layer order.
/// * `Err(ShowerError::LayerOutOfRange)` if a hit refers to a slab outside the detector.
///
/// Notes
/// ----------
/// * Mean and sigma use the raw, unweighted coordinates and divide by the hit count
///   (population standard deviation).
/// * The centroid is energy weighted and left undefined when the energy sum is zero.
pub fn aggregate_layers(
    hits: &[Hit],
    params: &DisplayParams,
) -> Result<Vec<LayerStats>, ShowerError> {
    let n_slabs = params.n_slabs;
    let mut acc = vec![LayerAccumulator::default(); n_slabs];

    for hit in hits {
        let a = acc.get_mut(hit.layer).ok_or(ShowerError::LayerOutOfRange {
            layer: hit.layer,
            n_slabs,
        })?;
        a.count += 1;
        a.energy += hit.energy;
        a.sum_x += hit.x;
        a.sum_y += hit.y;
        a.weighted_x += hit.x * hit.energy;
        a.weighted_y += hit.y * hit.energy;
        a.last_z = Some(hit.z);
    }

    let means: Vec<Option<(f64, f64)>> = acc
        .iter()
        .map(|a| {
            (a.count > 0).then(|| (a.sum_x / a.count as f64, a.sum_y / a.count as f64))
        })
        .collect();

    // second pass: squared deviations from the unweighted mean
    let mut sq_dev = vec![(0.0_f64, 0.0_f64); n_slabs];
    for hit in hits {
        if let Some((mx, my)) = means[hit.layer] {
            let d = &mut sq_dev[hit.layer];
            d.0 += (hit.x - mx).powi(2);
            d.1 += (hit.y - my).powi(2);
        }
    }

    let stats = acc
        .iter()
        .zip(means)
        .zip(sq_dev)
        .enumerate()
        .map(|(layer, ((a, mean), (dx2, dy2)))| {
            let depth = match (params.depth_model, a.last_z) {
                (DepthModel::LastHitZ, Some(z)) => z,
                _ => nominal_depth(layer, params),
            };

            let Some((mean_x, mean_y)) = mean else {
                return LayerStats::empty(layer, depth);
            };

            let n = a.count as f64;
            let centroid = (a.energy != 0.0)
                .then(|| Point2::new(a.weighted_x / a.energy, a.weighted_y / a.energy));

            LayerStats {
                layer,
                hit_count: a.count,
                energy_sum: a.energy,
                centroid,
                depth,
                x: AxisStats {
                    mean: mean_x,
                    sigma: (dx2 / n).sqrt(),
                },
                y: AxisStats {
                    mean: mean_y,
                    sigma: (dy2 / n).sqrt(),
                },
            }
        })
        .collect();

    Ok(stats)
}
