//! # Event display parameters
//!
//! This module defines [`DisplayParams`], the configuration carried by the navigation context
//! and passed by reference to every stage of the per-event recomputation, together with its
//! validating builder.
//!
//! ## Purpose
//!
//! [`DisplayParams`] gathers everything that describes the detector and tunes the pipeline:
//!
//! - **Geometry** – number of slabs, nominal slab positions, depth model of the centroids,
//!   depth of each slab in radiation lengths, detector depth used for the axis segment.
//! - **Selection** – [`ValidityCriteria`] deciding which layers enter the fit.
//! - **Fit** – [`FitParams`] (solver and limits).
//! - **Rendering hand-off** – palette range, hit-box size, hit-map binning.
//!
//! ## Example
//!
//! ```rust
//! use shower_axis::display_params::DisplayParams;
//! use shower_axis::axis_fit::{FitMethod, FitParams};
//! use shower_axis::layers::DepthModel;
//!
//! let params = DisplayParams::builder()
//!     .depth_model(DepthModel::Nominal)
//!     .fit(FitParams::builder().method(FitMethod::Newton).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! println!("{params:#}");
//! ```
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use nalgebra::Vector3;

use crate::{
    axis_fit::FitParams,
    constants::{
        Millimeter, RadiationLength, DETECTOR_DEPTH, FIRST_LAYER_Z, HIT_BOX_SIZE, LAYER_PITCH,
        LAYER_X0, N_SLABS, PALETTE_RANGE,
    },
    layers::{hit_map::HitMapBinning, validity::ValidityCriteria, DepthModel},
    shower_errors::ShowerError,
};

/// Energy interval mapped onto the hit color palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PaletteRange {
    fn default() -> Self {
        PaletteRange {
            min: PALETTE_RANGE.0,
            max: PALETTE_RANGE.1,
        }
    }
}

impl PaletteRange {
    /// Position of `value` in the palette, clamped to `[0, 1]`.
    pub fn level(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Configuration of the event display pipeline.
///
/// Fields
/// -----------------
/// **Geometry**
/// * `n_slabs` – number of layers; every hit must satisfy `layer < n_slabs`.
/// * `depth_model` – how the centroid depth of a layer is obtained.
/// * `first_layer_z`, `layer_pitch` – nominal slab positions `first_layer_z + ℓ × layer_pitch`.
/// * `layer_x0` – depth of each slab in radiation lengths, `n_slabs` entries.
/// * `detector_depth` – length of the drawn axis segment `[0, detector_depth]`.
///
/// **Selection / fit**
/// * `validity` – thresholds of the layer validity predicate.
/// * `fit` – solver and limits of the axis fit.
///
/// **Rendering hand-off**
/// * `palette` – energy range of the hit color palette.
/// * `hit_box_size` – size of the box drawn for each hit.
/// * `hit_map` – binning of the per-layer hit maps.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayParams {
    pub n_slabs: usize,
    pub depth_model: DepthModel,
    pub first_layer_z: Millimeter,
    pub layer_pitch: Millimeter,
    pub layer_x0: Vec<RadiationLength>,
    pub detector_depth: Millimeter,

    pub validity: ValidityCriteria,
    pub fit: FitParams,

    pub palette: PaletteRange,
    pub hit_box_size: Vector3<f64>,
    pub hit_map: HitMapBinning,
}

impl Default for DisplayParams {
    fn default() -> Self {
        DisplayParams {
            n_slabs: N_SLABS,
            depth_model: DepthModel::LastHitZ,
            first_layer_z: FIRST_LAYER_Z,
            layer_pitch: LAYER_PITCH,
            layer_x0: LAYER_X0.to_vec(),
            detector_depth: DETECTOR_DEPTH,

            validity: ValidityCriteria::default(),
            fit: FitParams::default(),

            palette: PaletteRange::default(),
            hit_box_size: Vector3::new(HIT_BOX_SIZE.0, HIT_BOX_SIZE.1, HIT_BOX_SIZE.2),
            hit_map: HitMapBinning::default(),
        }
    }
}

impl DisplayParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DisplayParamsBuilder {
        DisplayParamsBuilder::new()
    }
}

/// Builder for [`DisplayParams`], with validation.
#[derive(Debug, Clone)]
pub struct DisplayParamsBuilder {
    params: DisplayParams,
}

impl Default for DisplayParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: DisplayParams::default(),
        }
    }

    // --- Geometry ---

    /// Set the number of slabs.
    ///
    /// If the radiation-length table no longer matches, it is rebuilt by linear extrapolation
    /// of the reference spacing, unless [`layer_x0`](Self::layer_x0) is called afterwards.
    pub fn n_slabs(mut self, v: usize) -> Self {
        self.params.n_slabs = v;
        if self.params.layer_x0.len() != v {
            let step = LAYER_X0[0];
            self.params.layer_x0 = (1..=v).map(|i| i as f64 * step).collect();
        }
        self
    }
    pub fn depth_model(mut self, v: DepthModel) -> Self {
        self.params.depth_model = v;
        self
    }
    pub fn first_layer_z(mut self, v: Millimeter) -> Self {
        self.params.first_layer_z = v;
        self
    }
    pub fn layer_pitch(mut self, v: Millimeter) -> Self {
        self.params.layer_pitch = v;
        self
    }
    pub fn layer_x0(mut self, v: Vec<RadiationLength>) -> Self {
        self.params.layer_x0 = v;
        self
    }
    pub fn detector_depth(mut self, v: Millimeter) -> Self {
        self.params.detector_depth = v;
        self
    }

    // --- Selection / fit ---
    pub fn validity(mut self, v: ValidityCriteria) -> Self {
        self.params.validity = v;
        self
    }
    pub fn fit(mut self, v: FitParams) -> Self {
        self.params.fit = v;
        self
    }

    // --- Rendering ---
    pub fn palette(mut self, min: f64, max: f64) -> Self {
        self.params.palette = PaletteRange { min, max };
        self
    }
    pub fn hit_box_size(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.params.hit_box_size = Vector3::new(dx, dy, dz);
        self
    }
    pub fn hit_map(mut self, v: HitMapBinning) -> Self {
        self.params.hit_map = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Return true iff a < b and comparable (i.e., not NaN).
    #[inline]
    fn lt(a: f64, b: f64) -> bool {
        a.partial_cmp(&b) == Some(Less)
    }

    /// Finalize the builder and produce a [`DisplayParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `n_slabs ≥ 1` and `layer_x0.len() == n_slabs`.
    /// * `layer_pitch > 0`, `detector_depth > 0`, `first_layer_z` finite.
    /// * `0 ≤ validity.sigma_lo < validity.sigma_hi`.
    /// * `palette.min < palette.max`.
    /// * every `hit_box_size` component `> 0`.
    /// * `hit_map.bins ≥ 1` and `hit_map.lo < hit_map.hi`.
    ///
    /// The nested [`FitParams`] is validated by its own builder.
    pub fn build(self) -> Result<DisplayParams, ShowerError> {
        let p = &self.params;

        if p.n_slabs == 0 {
            return Err(ShowerError::InvalidDisplayParameter(
                "n_slabs must be >= 1".into(),
            ));
        }
        if p.layer_x0.len() != p.n_slabs {
            return Err(ShowerError::InvalidDisplayParameter(format!(
                "layer_x0 has {} entries, expected n_slabs = {}",
                p.layer_x0.len(),
                p.n_slabs
            )));
        }
        if !Self::gt0(p.layer_pitch) || !Self::gt0(p.detector_depth) {
            return Err(ShowerError::InvalidDisplayParameter(
                "layer_pitch and detector_depth must be > 0".into(),
            ));
        }
        if !p.first_layer_z.is_finite() {
            return Err(ShowerError::InvalidDisplayParameter(
                "first_layer_z must be finite".into(),
            ));
        }
        if !Self::ge0(p.validity.sigma_lo) || !Self::lt(p.validity.sigma_lo, p.validity.sigma_hi)
        {
            return Err(ShowerError::InvalidDisplayParameter(
                "require 0 <= sigma_lo < sigma_hi".into(),
            ));
        }
        if !Self::lt(p.palette.min, p.palette.max) {
            return Err(ShowerError::InvalidDisplayParameter(
                "palette min must be < max".into(),
            ));
        }
        if !p.hit_box_size.iter().all(|&s| Self::gt0(s)) {
            return Err(ShowerError::InvalidDisplayParameter(
                "hit_box_size components must be > 0".into(),
            ));
        }
        if p.hit_map.bins == 0 || !Self::lt(p.hit_map.lo, p.hit_map.hi) {
            return Err(ShowerError::InvalidDisplayParameter(
                "hit_map requires bins >= 1 and lo < hi".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for DisplayParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Event Display Parameters")?;
            writeln!(f, "------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Geometry]")?;
            line!("n_slabs         = {}", self.n_slabs, "Number of layers")?;
            line!(
                "depth_model     = {:?}",
                self.depth_model,
                "Centroid depth source"
            )?;
            line!(
                "first_layer_z   = {:.2} mm",
                self.first_layer_z,
                "Nominal z of layer 0"
            )?;
            line!(
                "layer_pitch     = {:.2} mm",
                self.layer_pitch,
                "Distance between layers"
            )?;
            line!(
                "detector_depth  = {:.1} mm",
                self.detector_depth,
                "Length of the drawn axis"
            )?;

            writeln!(f, "\n[Selection / fit]")?;
            line!("validity        = {}", self.validity, "Valid layer predicate")?;
            line!("fit             = {}", self.fit, "Axis solver")?;

            writeln!(f, "\n[Rendering]")?;
            line!(
                "palette         = {:?}",
                (self.palette.min, self.palette.max),
                "Energy color range"
            )?;
            line!(
                "hit_map         = {}",
                format!(
                    "{}x{} over [{}, {}]",
                    self.hit_map.bins, self.hit_map.bins, self.hit_map.lo, self.hit_map.hi
                ),
                "Per-layer hit map binning"
            )?;

            Ok(())
        } else {
            write!(
                f,
                "DisplayParams(n_slabs={}, depth_model={:?}, validity=[{}], {}, \
                 detector_depth={:.0}mm)",
                self.n_slabs, self.depth_model, self.validity, self.fit, self.detector_depth
            )
        }
    }
}

#[cfg(test)]
mod display_params_test {
    use super::*;

    #[test]
    fn test_default_is_reference_detector() {
        let p = DisplayParams::default();
        assert_eq!(p.n_slabs, 15);
        assert_eq!(p.layer_x0.len(), 15);
        assert_eq!(p.detector_depth, 210.0);
        assert_eq!(p.validity.min_hits, 10);
        assert_eq!(p.palette, PaletteRange { min: 0.0, max: 10.0 });
        assert!(DisplayParams::builder().build().is_ok());
    }

    #[test]
    fn test_n_slabs_resizes_x0_table() {
        let p = DisplayParams::builder().n_slabs(4).build().unwrap();
        assert_eq!(p.layer_x0.len(), 4);

        let err = DisplayParams::builder()
            .n_slabs(4)
            .layer_x0(vec![1.0, 2.0])
            .build();
        assert_eq!(
            err,
            Err(ShowerError::InvalidDisplayParameter(
                "layer_x0 has 2 entries, expected n_slabs = 4".into()
            ))
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(DisplayParams::builder().n_slabs(0).build().is_err());
        assert!(DisplayParams::builder().layer_pitch(0.0).build().is_err());
        assert!(DisplayParams::builder().palette(10.0, 0.0).build().is_err());
        assert!(DisplayParams::builder()
            .hit_box_size(5.0, f64::NAN, 0.5)
            .build()
            .is_err());
        assert!(DisplayParams::builder()
            .validity(ValidityCriteria {
                min_hits: 10,
                sigma_lo: 20.0,
                sigma_hi: 20.0,
            })
            .build()
            .is_err());
    }

    #[test]
    fn test_palette_level_is_clamped() {
        let pal = PaletteRange::default();
        assert_eq!(pal.level(-3.0), 0.0);
        assert_eq!(pal.level(5.0), 0.5);
        assert_eq!(pal.level(42.0), 1.0);
    }

    #[test]
    fn test_display_forms() {
        let p = DisplayParams::default();
        let short = format!("{p}");
        assert!(short.starts_with("DisplayParams(n_slabs=15"));

        let long = format!("{p:#}");
        assert!(long.contains("[Geometry]"));
        assert!(long.contains("n_slabs         = 15"));
        assert!(long.contains("32x32 over [-90, 90]"));
    }
}
