//! # Batch axis scan
//!
//! Runs the per-event recomputation over every navigation index of a store, without a
//! controller or a renderer, and collects one summary per event. Failures are isolated: an
//! empty entry or a hit outside the detector marks that event as failed and the scan moves on.
//!
//! ### Progress UI (feature: `progress`)
//! When compiled with the `progress` feature, [`scan_events`] renders an `indicatif` progress
//! bar on stderr while the events are processed.
//!
//! ```rust
//! use shower_axis::axis_scan::scan_events;
//! use shower_axis::display_params::DisplayParams;
//! use shower_axis::hits::{event_store::InMemoryEventStore, Hit};
//!
//! let store = InMemoryEventStore::new(vec![vec![Hit::new(0.0, 0.0, 0.5, 0, 1.0)], vec![]]);
//! let scan = scan_events(&store, &DisplayParams::default());
//!
//! let summary = scan.summary();
//! assert_eq!(summary.events, 2);
//! assert_eq!(summary.failed, 1);
//! assert_eq!(summary.skipped, 1);
//! ```
use std::fmt;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Vector2;
use tracing::warn;

use crate::{
    axis_fit::line_fit_result::LineFitResult,
    constants::{Energy, NavIndex},
    display_params::DisplayParams,
    hits::event_store::EventStore,
    navigation::event_cache::EventCache,
    shower_errors::ShowerError,
};

/// Outcome of the recomputation of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub event_index: NavIndex,
    pub hit_count: usize,
    pub total_energy: Energy,
    pub valid_layers: usize,
    pub fit: Option<LineFitResult>,
}

impl From<&EventCache> for EventSummary {
    fn from(cache: &EventCache) -> Self {
        EventSummary {
            event_index: cache.event_index,
            hit_count: cache.hit_count(),
            total_energy: cache.total_energy,
            valid_layers: cache.valid_layers.len(),
            fit: cache.fit.clone(),
        }
    }
}

/// Per-event results of a scan, in navigation order.
#[derive(Debug, PartialEq, Default)]
pub struct AxisScan {
    pub results: Vec<Result<EventSummary, ShowerError>>,
}

/// Counts over an [`AxisScan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub events: usize,
    pub failed: usize,
    /// Events loaded but with too few valid layers to fit.
    pub skipped: usize,
    pub converged: usize,
    pub not_converged: usize,
}

impl AxisScan {
    /// Offsets `(p0, p1)` of every converged fit, with the event they belong to.
    pub fn converged_offsets(&self) -> Vec<(NavIndex, Vector2<f64>)> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .filter_map(|s| {
                s.fit
                    .as_ref()
                    .filter(|f| f.converged)
                    .map(|f| (s.event_index, f.offset()))
            })
            .collect()
    }

    pub fn summary(&self) -> ScanSummary {
        self.results
            .iter()
            .fold(ScanSummary::default(), |mut acc, r| {
                acc.events += 1;
                match r {
                    Err(_) => acc.failed += 1,
                    Ok(EventSummary { fit: None, .. }) => acc.skipped += 1,
                    Ok(EventSummary { fit: Some(f), .. }) if f.converged => acc.converged += 1,
                    Ok(_) => acc.not_converged += 1,
                }
                acc
            })
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events: {} converged, {} not converged, {} skipped, {} failed",
            self.events, self.converged, self.not_converged, self.skipped, self.failed
        )
    }
}

fn scan_one<S: EventStore + ?Sized>(
    store: &S,
    nav_index: NavIndex,
    params: &DisplayParams,
) -> Result<EventSummary, ShowerError> {
    let entry = store.get_entry(nav_index)?;
    if entry.is_empty() {
        return Err(ShowerError::EmptyEntry(nav_index));
    }
    let cache = EventCache::compute(nav_index, entry, params)?;
    Ok(EventSummary::from(&cache))
}

/// Recompute every event of `store`.
///
/// Arguments
/// -----------------
/// * `store`: Source of the events, scanned from index `0` to `event_count() - 1`.
/// * `params`: Pipeline configuration shared by every event.
///
/// Return
/// ----------
/// * An [`AxisScan`] with exactly `store.event_count()` results.
pub fn scan_events<S: EventStore + ?Sized>(store: &S, params: &DisplayParams) -> AxisScan {
    let total = store.event_count();

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new((total as u64).max(1));
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    };

    let mut results = Vec::with_capacity(total);
    for nav_index in 0..total {
        let res = scan_one(store, nav_index, params);
        if let Err(err) = &res {
            warn!(event = nav_index, %err, "event skipped by the scan");
        }
        results.push(res);

        #[cfg(feature = "progress")]
        pb.inc(1);
    }

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    AxisScan { results }
}
