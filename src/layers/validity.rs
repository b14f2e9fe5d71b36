//! # Layer validity filter
//!
//! Selects which layers' centroids are trusted inputs to the axis fit.
//!
//! A layer `ℓ` is **valid** when
//!
//! ```text
//! hit_count > min_hits   AND   sigma_lo < σx < sigma_hi   AND   sigma_lo < σy < sigma_hi
//! ```
//!
//! with the reference values `min_hits = 10`, `(sigma_lo, sigma_hi) = (0, 20)` mm.
//! Too few hits make the centroid statistically unreliable; a zero spread is a pathological
//! single-point cluster; a spread at or above the shower-core width means the layer is noise
//! dominated or scattered over the whole sensor.
//!
//! The predicate is evaluated independently per layer; empty layers carry sentinel sigmas and are
//! always rejected.
use std::fmt;

use smallvec::SmallVec;

use crate::{
    constants::{LayerIndex, MAX_VALID_SIGMA, MIN_VALID_HITS},
    layers::{AxisStats, LayerStats},
};

/// Ordered subset of layer indices accepted by the filter.
pub type ValidLayerSet = SmallVec<[LayerIndex; 16]>;

/// Thresholds of the validity predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityCriteria {
    /// A layer needs strictly more hits than this.
    pub min_hits: usize,
    /// Exclusive lower bound on σx and σy.
    pub sigma_lo: f64,
    /// Exclusive upper bound on σx and σy.
    pub sigma_hi: f64,
}

impl Default for ValidityCriteria {
    fn default() -> Self {
        ValidityCriteria {
            min_hits: MIN_VALID_HITS,
            sigma_lo: 0.0,
            sigma_hi: MAX_VALID_SIGMA,
        }
    }
}

impl ValidityCriteria {
    fn sigma_ok(&self, axis: &AxisStats) -> bool {
        self.sigma_lo < axis.sigma && axis.sigma < self.sigma_hi
    }

    /// Evaluate the predicate on one layer.
    pub fn accepts(&self, layer: &LayerStats) -> bool {
        !layer.is_empty()
            && layer.hit_count > self.min_hits
            && self.sigma_ok(&layer.x)
            && self.sigma_ok(&layer.y)
    }
}

impl fmt::Display for ValidityCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nhit > {}, {} < σx,σy < {}",
            self.min_hits, self.sigma_lo, self.sigma_hi
        )
    }
}

/// Indices of the layers satisfying `criteria`, in layer order.
pub fn select_valid_layers(stats: &[LayerStats], criteria: &ValidityCriteria) -> ValidLayerSet {
    stats
        .iter()
        .filter(|s| criteria.accepts(s))
        .map(|s| s.layer)
        .collect()
}
