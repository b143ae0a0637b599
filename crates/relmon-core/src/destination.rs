//! Per-relation destination index.
//!
//! Each relation keeps its destinations sorted by name. A destination entry
//! owns the set of origins that point at it under that relation, so an edge
//! exists exactly when its origin is a member of the destination's set.

use crate::error::StoreError;
use crate::ordered_set::{Name, OrderedNameSet};

/// One destination within a relation, plus everyone pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationEntry {
    name: Name,
    origins: OrderedNameSet,
}

impl DestinationEntry {
    fn new(name: Name) -> Self {
        Self {
            name,
            origins: OrderedNameSet::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn origins(&self) -> &OrderedNameSet {
        &self.origins
    }

    /// Number of distinct origins with an edge into this destination.
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    pub(crate) fn origins_mut(&mut self) -> &mut OrderedNameSet {
        &mut self.origins
    }
}

/// Destinations of a single relation, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationIndex {
    entries: Vec<DestinationEntry>,
}

impl DestinationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self, destination: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| (*entry.name).cmp(destination))
    }

    pub fn find(&self, destination: &str) -> Option<&DestinationEntry> {
        self.search(destination).ok().map(|pos| &self.entries[pos])
    }

    /// Returns the position of `destination`, creating an empty entry at its
    /// sorted position if it does not exist yet.
    ///
    /// The second value is true when the entry was created by this call.
    pub fn get_or_create(&mut self, destination: &Name) -> Result<(usize, bool), StoreError> {
        match self.search(destination) {
            Ok(pos) => Ok((pos, false)),
            Err(pos) => {
                self.entries
                    .try_reserve(1)
                    .map_err(|_| StoreError::CapacityExhausted {
                        what: "destination index",
                    })?;
                self.entries
                    .insert(pos, DestinationEntry::new(destination.clone()));
                Ok((pos, true))
            }
        }
    }

    pub fn get(&self, pos: usize) -> &DestinationEntry {
        &self.entries[pos]
    }

    pub(crate) fn get_mut(&mut self, pos: usize) -> &mut DestinationEntry {
        &mut self.entries[pos]
    }

    /// Removes the entry at `pos`, shifting the rest left.
    pub(crate) fn remove_at(&mut self, pos: usize) -> DestinationEntry {
        self.entries.remove(pos)
    }

    /// Removes `destination` if present.
    pub fn remove(&mut self, destination: &str) -> Option<DestinationEntry> {
        self.search(destination)
            .ok()
            .map(|pos| self.entries.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationEntry> + '_ {
        self.entries.iter()
    }

    pub(crate) fn as_slice(&self) -> &[DestinationEntry] {
        &self.entries
    }
}
