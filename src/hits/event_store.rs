//! # Event store: random access to the hits of one event
//!
//! The [`EventStore`] trait is the narrow interface through which the navigation layer obtains
//! the hits of an event. File and tree parsing live outside this crate; any source able to
//! answer "how many events" and "give me the hits of event *i*" can drive the display.
//!
//! Indices passed to a store are **navigation indices**. Stores that browse a subset of a larger
//! dataset translate them with an [`EventList`] before touching the storage.
//!
//! ## Provided implementation
//!
//! [`InMemoryEventStore`] keeps every storage entry as a `Vec<Hit>` and an [`EventList`] mapping
//! navigation indices onto them. It is used by the tests, the benchmarks, and the demo driver.
//!
//! ```rust
//! use shower_axis::hits::Hit;
//! use shower_axis::hits::event_store::{EventStore, InMemoryEventStore};
//!
//! let store = InMemoryEventStore::new(vec![
//!     vec![Hit::new(1.0, 2.0, 0.5, 0, 3.0)],
//!     vec![],
//! ]);
//!
//! assert_eq!(store.event_count(), 2);
//! assert!(store.get_entry(0).is_ok());
//! assert!(store.get_entry(1).is_err()); // empty entry
//! ```
use crate::{
    constants::{Energy, NavIndex},
    hits::{event_list::EventList, Hit},
    shower_errors::ShowerError,
};

/// Hits of one event, together with the totals reported on navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub hits: Vec<Hit>,
    pub hit_count: usize,
    pub total_energy: Energy,
}

impl EventEntry {
    /// Wrap a hit list and compute its totals.
    pub fn from_hits(hits: Vec<Hit>) -> Self {
        let total_energy = hits.iter().map(|h| h.energy).sum();
        EventEntry {
            hit_count: hits.len(),
            total_energy,
            hits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Random-access source of events.
///
/// Implementations must be deterministic: two calls to [`get_entry`](EventStore::get_entry)
/// with the same index return the same hits.
pub trait EventStore {
    /// Number of navigable events.
    fn event_count(&self) -> usize;

    /// Retrieve the hits of the event at `nav_index`.
    ///
    /// Return
    /// ----------
    /// * `Ok(EventEntry)` with at least one hit.
    /// * `Err(ShowerError::InvalidIndex)` if `nav_index >= event_count()`.
    /// * `Err(ShowerError::EmptyEntry)` if the underlying entry holds no data.
    fn get_entry(&self, nav_index: NavIndex) -> Result<EventEntry, ShowerError>;
}

/// Event store holding every entry in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    entries: Vec<Vec<Hit>>,
    list: EventList,
}

impl InMemoryEventStore {
    /// Store navigating every entry in order.
    pub fn new(entries: Vec<Vec<Hit>>) -> Self {
        let list = EventList::identity(entries.len());
        InMemoryEventStore { entries, list }
    }

    /// Store navigating only the entries listed in `list`.
    ///
    /// Entry numbers pointing past the stored entries are kept; they read back as empty entries.
    pub fn with_event_list(entries: Vec<Vec<Hit>>, list: EventList) -> Self {
        InMemoryEventStore { entries, list }
    }

    /// Store navigating the entries whose hits satisfy `select`, in storage order.
    ///
    /// Arguments
    /// -----------------
    /// * `entries`: Every entry of the run.
    /// * `select`: Predicate deciding whether an entry is part of the navigation list.
    ///
    /// Return
    /// ----------
    /// * A store whose navigation index `i` maps to the `i`-th selected entry.
    pub fn with_selection<F>(entries: Vec<Vec<Hit>>, select: F) -> Self
    where
        F: Fn(&[Hit]) -> bool,
    {
        let list = EventList::from_entries(
            entries
                .iter()
                .enumerate()
                .filter(|(_, hits)| select(hits))
                .map(|(entry, _)| entry as u64),
        );
        InMemoryEventStore { entries, list }
    }

    pub fn event_list(&self) -> &EventList {
        &self.list
    }

    /// Number of entries in the underlying storage, selected or not.
    pub fn stored_entries(&self) -> usize {
        self.entries.len()
    }
}

impl EventStore for InMemoryEventStore {
    fn event_count(&self) -> usize {
        self.list.len()
    }

    fn get_entry(&self, nav_index: NavIndex) -> Result<EventEntry, ShowerError> {
        let entry = self
            .list
            .entry(nav_index)
            .ok_or(ShowerError::InvalidIndex {
                index: nav_index as i64,
                event_count: self.list.len(),
            })?;

        match usize::try_from(entry).ok().and_then(|e| self.entries.get(e)) {
            Some(hits) if !hits.is_empty() => Ok(EventEntry::from_hits(hits.clone())),
            _ => Err(ShowerError::EmptyEntry(nav_index)),
        }
    }
}
