//! # Calorimeter hits and their storage
//!
//! A [`Hit`] is one reconstructed cell signal of the detector: its position, the slab it
//! belongs to, its calibrated energy, and the readout metadata (`adc_high`, chip, channel,
//! SCA) carried through unchanged for display.
//!
//! Modules
//! -----------------
//! * [`event_store`](crate::hits::event_store) – Random-access source of hits per navigation
//!   index ([`EventStore`](crate::hits::event_store::EventStore)) and an in-memory implementation.
//! * [`event_list`](crate::hits::event_list) – Translation from navigation index to storage entry
//!   number, used to browse a pre-selected subset of a larger dataset.
//!
//! Hits are produced by the store for the current event and owned by the per-event cache
//! ([`EventCache`](crate::navigation::event_cache::EventCache)); they are dropped on the next
//! successful navigation.
use std::fmt;

use nalgebra::Point3;

use crate::constants::{Energy, LayerIndex, Millimeter};

pub mod event_list;
pub mod event_store;

/// A single calorimeter hit.
///
/// Fields
/// -----------------
/// * `x`, `y`, `z` – Position of the cell in the detector frame (mm), `z` along the beam.
/// * `layer` – Slab index, `0 ≤ layer < n_slabs`.
/// * `energy` – Calibrated energy deposit.
/// * `adc_high` – High-gain ADC count of the readout.
/// * `is_hit` – Trigger bit of the readout cell.
/// * `chip`, `channel`, `sca` – Readout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub x: Millimeter,
    pub y: Millimeter,
    pub z: Millimeter,
    pub layer: LayerIndex,
    pub energy: Energy,
    pub adc_high: i32,
    pub is_hit: bool,
    pub chip: u16,
    pub channel: u16,
    pub sca: u16,
}

impl Hit {
    /// Build a hit from its geometry and energy, with zeroed readout metadata.
    ///
    /// `is_hit` is set to `true` and `adc_high` to `0`.
    pub fn new(
        x: Millimeter,
        y: Millimeter,
        z: Millimeter,
        layer: LayerIndex,
        energy: Energy,
    ) -> Self {
        Hit {
            x,
            y,
            z,
            layer,
            energy,
            adc_high: 0,
            is_hit: true,
            chip: 0,
            channel: 0,
            sca: 0,
        }
    }

    /// Attach readout metadata to the hit.
    pub fn with_readout(mut self, adc_high: i32, chip: u16, channel: u16, sca: u16) -> Self {
        self.adc_high = adc_high;
        self.chip = chip;
        self.channel = channel;
        self.sca = sca;
        self
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// `true` when the calibrated energy exceeds the high-gain ADC count.
    ///
    /// Such hits are flagged in the display as saturated.
    pub fn is_saturated(&self) -> bool {
        (self.adc_high as f64) < self.energy
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hit_adc_high={}\n hit_energy={:.6}\n hit_isHit={}\n ({},{},{},{})",
            self.adc_high,
            self.energy,
            u8::from(self.is_hit),
            self.layer,
            self.chip,
            self.channel,
            self.sca
        )
    }
}
