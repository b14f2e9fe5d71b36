//! # Detector constants and type definitions
//!
//! This module centralizes the **geometry constants**, **sentinel values**, and **type aliases**
//! shared by the aggregation, filtering, and fitting stages of the crate.
//!
//! ## Overview
//!
//! - Reference detector geometry (15 silicon–tungsten slabs, 15 mm pitch, ±90 mm sensors)
//! - Sentinel values used for undefined per-layer statistics
//! - Depth of each slab expressed in radiation lengths (shower profile abscissa)
//! - Defaults for the rendering collaborator (palette range, hit-box size, hit-map binning)
//!
//! All lengths are in **millimeters**, energies in the calibrated hit unit (MIP).

// -------------------------------------------------------------------------------------------------
// Geometry
// -------------------------------------------------------------------------------------------------

/// Number of slabs (layers) of the reference detector
pub const N_SLABS: usize = 15;

/// Longitudinal extent of the detector, used as the length of the fitted axis segment
pub const DETECTOR_DEPTH: f64 = 210.0;

/// Nominal z of the first slab (center of a 1 mm thick plane)
pub const FIRST_LAYER_Z: f64 = 0.5;

/// Distance between two consecutive slabs
pub const LAYER_PITCH: f64 = 15.0;

/// Lateral half-width of a sensor plane
pub const SENSOR_HALF_WIDTH: f64 = 90.0;

/// Depth of each slab in radiation lengths (X0)
pub const LAYER_X0: [f64; N_SLABS] = [
    1.198630137,
    2.397260274,
    3.595890411,
    4.794520548,
    5.993150685,
    7.191780822,
    8.390410959,
    9.589041096,
    10.78767123,
    12.38584475,
    13.98401826,
    15.58219178,
    17.1803653,
    18.77853881,
    20.37671233,
];

// -------------------------------------------------------------------------------------------------
// Sentinels and selection defaults
// -------------------------------------------------------------------------------------------------

/// Value carried by the mean and sigma of a layer without hits
pub const SENTINEL_STAT: f64 = -1000.0;

/// A layer needs strictly more hits than this to be trusted by the axis fit
pub const MIN_VALID_HITS: usize = 10;

/// Exclusive upper bound on the lateral spread of a trusted layer
pub const MAX_VALID_SIGMA: f64 = 20.0;

// -------------------------------------------------------------------------------------------------
// Rendering defaults
// -------------------------------------------------------------------------------------------------

/// Energy range mapped onto the hit color palette
pub const PALETTE_RANGE: (f64, f64) = (0.0, 10.0);

/// Size (dx, dy, dz) of the box drawn for each hit
pub const HIT_BOX_SIZE: (f64, f64, f64) = (5.0, 5.0, 0.5);

/// Number of bins per axis of a layer hit map
pub const HIT_MAP_BINS: usize = 32;

/// Number of points used when sampling the fitted axis as a polyline
pub const AXIS_POLYLINE_POINTS: usize = 1000;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Length in millimeters
pub type Millimeter = f64;
/// Calibrated hit energy (MIP)
pub type Energy = f64;
/// Depth in radiation lengths
pub type RadiationLength = f64;
/// Index of a slab, `0 ≤ layer < n_slabs`
pub type LayerIndex = usize;
/// Position in the navigation list of events
pub type NavIndex = usize;
/// Entry number in the underlying event storage
pub type EntryNumber = u64;
