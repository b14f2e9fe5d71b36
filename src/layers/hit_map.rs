//! # Per-layer 2-D hit maps
//!
//! A [`HitMap`] is an energy-weighted histogram of the hit positions of one slab, binned on a
//! regular `bins × bins` grid over `[lo, hi]²` (32 × 32 over ±90 mm for the reference sensor).
//! Entries falling outside the grid are not clamped into the edge bins: their weight is
//! accumulated separately in [`HitMap::overflow`].
//!
//! The matrix is stored as a [`nalgebra::DMatrix`] indexed `(ix, iy)`.
use nalgebra::DMatrix;

use crate::{constants::LayerIndex, hits::Hit};

/// Binning shared by every layer hit map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMapBinning {
    pub bins: usize,
    pub lo: f64,
    pub hi: f64,
}

impl Default for HitMapBinning {
    fn default() -> Self {
        HitMapBinning {
            bins: crate::constants::HIT_MAP_BINS,
            lo: -crate::constants::SENSOR_HALF_WIDTH,
            hi: crate::constants::SENSOR_HALF_WIDTH,
        }
    }
}

impl HitMapBinning {
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.bins as f64
    }

    /// Bin index of a coordinate, `None` outside `[lo, hi)` or when there are no bins.
    pub fn bin_of(&self, v: f64) -> Option<usize> {
        if self.bins == 0 || !(self.lo..self.hi).contains(&v) {
            return None;
        }
        let i = ((v - self.lo) / self.bin_width()) as usize;
        Some(i.min(self.bins - 1))
    }

    /// Center of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.lo + (i as f64 + 0.5) * self.bin_width()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitMap {
    pub layer: LayerIndex,
    pub binning: HitMapBinning,
    pub content: DMatrix<f64>,
    pub overflow: f64,
    pub entries: usize,
}

impl HitMap {
    pub fn new(layer: LayerIndex, binning: HitMapBinning) -> Self {
        HitMap {
            layer,
            binning,
            content: DMatrix::zeros(binning.bins, binning.bins),
            overflow: 0.0,
            entries: 0,
        }
    }

    /// Add `weight` at `(x, y)`.
    pub fn fill(&mut self, x: f64, y: f64, weight: f64) {
        self.entries += 1;
        match (self.binning.bin_of(x), self.binning.bin_of(y)) {
            (Some(ix), Some(iy)) => self.content[(ix, iy)] += weight,
            _ => self.overflow += weight,
        }
    }

    /// Weight accumulated in the bin containing `(x, y)`.
    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let ix = self.binning.bin_of(x)?;
        let iy = self.binning.bin_of(y)?;
        Some(self.content[(ix, iy)])
    }

    /// Sum of the in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.content.sum()
    }

    pub fn max_value(&self) -> f64 {
        self.content.max()
    }
}

/// Build one hit map per layer, in layer order.
///
/// Hits whose layer is outside `0..n_slabs` are ignored; the aggregation stage is responsible
/// for rejecting them.
pub fn build_hit_maps(hits: &[Hit], n_slabs: usize, binning: HitMapBinning) -> Vec<HitMap> {
    let mut maps: Vec<HitMap> = (0..n_slabs).map(|l| HitMap::new(l, binning)).collect();
    for hit in hits {
        if let Some(map) = maps.get_mut(hit.layer) {
            map.fill(hit.x, hit.y, hit.energy);
        }
    }
    maps
}

#[cfg(test)]
mod hit_map_test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_binning() {
        let b = HitMapBinning::default();
        assert_relative_eq!(b.bin_width(), 5.625);
        assert_eq!(b.bin_of(-90.0), Some(0));
        assert_eq!(b.bin_of(0.0), Some(16));
        assert_eq!(b.bin_of(89.99), Some(31));
        assert_eq!(b.bin_of(90.0), None);
        assert_eq!(b.bin_of(-95.0), None);
        assert_relative_eq!(b.bin_center(0), -87.1875);
    }

    #[test]
    fn test_fill_weights_and_overflow() {
        let hits = vec![
            Hit::new(1.0, 1.0, 0.5, 0, 2.0),
            Hit::new(2.0, 2.0, 0.5, 0, 3.0),
            Hit::new(120.0, 0.0, 0.5, 0, 4.0),
            Hit::new(-50.0, 30.0, 15.5, 1, 1.5),
        ];
        let maps = build_hit_maps(&hits, 3, HitMapBinning::default());

        assert_eq!(maps.len(), 3);
        assert_relative_eq!(maps[0].value_at(1.5, 1.5).unwrap(), 5.0);
        assert_relative_eq!(maps[0].overflow, 4.0);
        assert_eq!(maps[0].entries, 3);
        assert_relative_eq!(maps[0].integral(), 5.0);
        assert_relative_eq!(maps[1].max_value(), 1.5);
        assert_eq!(maps[2].entries, 0);
    }

    #[test]
    fn test_no_bins_sends_everything_to_overflow() {
        let binning = HitMapBinning {
            bins: 0,
            ..HitMapBinning::default()
        };
        assert_eq!(binning.bin_of(0.0), None);

        let maps = build_hit_maps(&[Hit::new(1.0, 1.0, 0.5, 0, 2.0)], 1, binning);
        assert_eq!(maps[0].value_at(1.0, 1.0), None);
        assert_relative_eq!(maps[0].overflow, 2.0);
        assert_eq!(maps[0].entries, 1);
    }
}
