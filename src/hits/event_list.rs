//! Navigation index → storage entry translation.
//!
//! The display browses an ordered list of entry numbers rather than the raw storage, so a
//! pre-selected subset of a large run can be navigated with contiguous indices `0..len`.
use crate::constants::{EntryNumber, NavIndex};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventList {
    entries: Vec<EntryNumber>,
}

impl EventList {
    /// List covering every entry `0..n` of the storage, in order.
    pub fn identity(n: usize) -> Self {
        EventList {
            entries: (0..n as EntryNumber).collect(),
        }
    }

    /// List built from explicit entry numbers, kept in the given order.
    pub fn from_entries(entries: impl IntoIterator<Item = EntryNumber>) -> Self {
        EventList {
            entries: entries.into_iter().collect(),
        }
    }

    /// Storage entry number for a navigation index, or `None` when out of range.
    pub fn entry(&self, nav_index: NavIndex) -> Option<EntryNumber> {
        self.entries.get(nav_index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[EntryNumber] {
        &self.entries
    }
}
