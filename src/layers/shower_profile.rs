//! Longitudinal shower profile: summed energy per layer against depth in radiation lengths.
use itertools::izip;

use crate::{
    constants::{Energy, LayerIndex, RadiationLength},
    layers::LayerStats,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub layer: LayerIndex,
    pub depth_x0: RadiationLength,
    pub energy: Energy,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowerProfile {
    pub points: Vec<ProfilePoint>,
}

impl ShowerProfile {
    /// Build the profile from the layer statistics and the per-layer depth table.
    ///
    /// Both slices are indexed by layer; the shorter one bounds the number of points.
    pub fn from_layers(stats: &[LayerStats], layer_x0: &[RadiationLength]) -> Self {
        let points = izip!(stats, layer_x0)
            .map(|(s, &depth_x0)| ProfilePoint {
                layer: s.layer,
                depth_x0,
                energy: s.energy_sum,
            })
            .collect();
        ShowerProfile { points }
    }

    pub fn total_energy(&self) -> Energy {
        self.points.iter().map(|p| p.energy).sum()
    }

    /// Point of maximum energy deposit, `None` if no layer collected energy.
    pub fn shower_max(&self) -> Option<&ProfilePoint> {
        self.points
            .iter()
            .filter(|p| p.energy > 0.0)
            .max_by(|a, b| a.energy.total_cmp(&b.energy))
    }
}

#[cfg(test)]
mod shower_profile_test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{constants::LAYER_X0, layers::AxisStats};

    fn stats(energies: &[f64]) -> Vec<LayerStats> {
        energies
            .iter()
            .enumerate()
            .map(|(layer, &energy_sum)| LayerStats {
                layer,
                hit_count: usize::from(energy_sum > 0.0),
                energy_sum,
                centroid: None,
                depth: 0.0,
                x: AxisStats::SENTINEL,
                y: AxisStats::SENTINEL,
            })
            .collect()
    }

    #[test]
    fn test_profile_follows_x0_table() {
        let profile = ShowerProfile::from_layers(&stats(&[1.0, 4.0, 2.0]), &LAYER_X0);
        assert_eq!(profile.points.len(), 3);
        assert_relative_eq!(profile.points[1].depth_x0, 2.397260274);
        assert_relative_eq!(profile.total_energy(), 7.0);
        assert_eq!(profile.shower_max().unwrap().layer, 1);
    }

    #[test]
    fn test_no_shower_max_without_energy() {
        let profile = ShowerProfile::from_layers(&stats(&[0.0, 0.0]), &LAYER_X0);
        assert!(profile.shower_max().is_none());
    }
}
