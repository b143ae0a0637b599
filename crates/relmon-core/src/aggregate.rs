//! Incrementally maintained arg-max of origin counts.
//!
//! Each relation remembers the highest origin count among its destinations
//! and which destinations reach it. Insertions update this in constant time.
//! Removing an origin from the only destination at the maximum forces a scan
//! of the whole destination index, since any remaining entry might now be
//! the unique maximum.

use crate::destination::DestinationIndex;
use crate::ordered_set::Name;
use tracing::trace;

/// The `(max_count, holders)` pair of one relation.
///
/// Holders are kept in maintenance order; callers that need a stable order
/// sort a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopDestinations {
    max_count: usize,
    holders: Vec<Name>,
}

impl TopDestinations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn holders(&self) -> &[Name] {
        &self.holders
    }

    /// Holder names in ascending order.
    pub fn sorted_holders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.holders.iter().map(|h| h.as_ref()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_holder(&self, destination: &str) -> bool {
        self.position(destination).is_some()
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    fn position(&self, destination: &str) -> Option<usize> {
        self.holders.iter().position(|h| &**h == destination)
    }

    /// Folds a freshly increased origin count into the aggregate.
    ///
    /// Only called once per new origin, so a destination that ties the
    /// maximum is never pushed twice.
    pub fn record_insert(&mut self, destination: &Name, origin_count: usize) {
        if origin_count > self.max_count {
            self.max_count = origin_count;
            self.holders.clear();
            self.holders.push(destination.clone());
        } else if origin_count == self.max_count {
            self.holders.push(destination.clone());
        }
    }

    /// Drops `destination` from the holders, keeping `max_count`.
    ///
    /// Only valid while another holder still sits at the maximum.
    pub fn drop_holder(&mut self, destination: &str) -> bool {
        match self.position(destination) {
            Some(pos) => {
                self.holders.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Notes that `destination` just lost an origin (or was removed).
    ///
    /// Returns true when it was the sole holder, in which case the holders
    /// are now empty and the caller must `recompute` before the aggregate is
    /// read again. A non-holder never affects the maximum.
    pub fn release(&mut self, destination: &str) -> bool {
        self.drop_holder(destination) && self.holders.is_empty()
    }

    /// Rebuilds the aggregate from scratch over `index`.
    pub fn recompute(&mut self, index: &DestinationIndex) {
        self.max_count = 0;
        self.holders.clear();
        for entry in index.iter() {
            self.record_insert(entry.name(), entry.origin_count());
        }
        // Entries without origins never hold the maximum.
        if self.max_count == 0 {
            self.holders.clear();
        }
        trace!(
            max_count = self.max_count,
            holders = self.holders.len(),
            "recomputed top destinations"
        );
    }

    /// What the aggregate should be for `index`, holders sorted.
    pub(crate) fn expected_for(index: &DestinationIndex) -> (usize, Vec<String>) {
        let max_count = index.iter().map(|e| e.origin_count()).max().unwrap_or(0);
        let holders = index
            .iter()
            .filter(|e| max_count > 0 && e.origin_count() == max_count)
            .map(|e| e.name().to_string())
            .collect();
        (max_count, holders)
    }
}
