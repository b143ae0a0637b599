//! Relation catalog.
//!
//! Relations are kept sorted by name. Each one owns its destination index
//! and the top-destinations aggregate over it. A relation only exists while
//! it has at least one edge.

use crate::aggregate::TopDestinations;
use crate::destination::DestinationIndex;
use crate::error::StoreError;
use crate::ordered_set::Name;
use tracing::debug;

/// Outcome of removing a single edge from a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRemoval {
    /// The edge did not exist.
    Absent,
    /// The edge was removed and the relation still has edges.
    Removed,
    /// The edge was the relation's last one; the relation is now empty.
    Emptied,
}

/// A named relation type with its destinations and aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    name: Name,
    destinations: DestinationIndex,
    top: TopDestinations,
}

impl RelationEntry {
    fn new(name: Name) -> Self {
        Self {
            name,
            destinations: DestinationIndex::new(),
            top: TopDestinations::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn destinations(&self) -> &DestinationIndex {
        &self.destinations
    }

    pub fn top(&self) -> &TopDestinations {
        &self.top
    }

    pub(crate) fn destinations_mut(&mut self) -> &mut DestinationIndex {
        &mut self.destinations
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Total number of edges of this relation type.
    pub fn edge_count(&self) -> usize {
        self.destinations.iter().map(|e| e.origin_count()).sum()
    }

    pub fn contains_edge(&self, origin: &str, destination: &str) -> bool {
        self.destinations
            .find(destination)
            .is_some_and(|entry| entry.origins().contains(origin))
    }

    /// Adds `origin -> destination`.
    ///
    /// Returns `Ok(false)` if the edge already existed. On failure a
    /// destination entry created by this call is removed again.
    pub fn insert_edge(&mut self, origin: &Name, destination: &Name) -> Result<bool, StoreError> {
        let (pos, _) = self.destinations.get_or_create(destination)?;
        let entry = self.destinations.get_mut(pos);

        match entry.origins_mut().insert(origin.clone()) {
            Ok(true) => {
                let count = entry.origin_count();
                self.top.record_insert(entry.name(), count);
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                self.discard_if_unused(pos);
                Err(e)
            }
        }
    }

    /// Drops the destination at `pos` if it has no origins.
    ///
    /// Only a freshly created destination can be in that state.
    pub(crate) fn discard_if_unused(&mut self, pos: usize) -> bool {
        if self.destinations.get(pos).origin_count() > 0 {
            return false;
        }
        self.destinations.remove_at(pos);
        true
    }

    /// Removes `origin -> destination`, keeping the aggregate exact.
    pub fn remove_edge(&mut self, origin: &str, destination: &str) -> EdgeRemoval {
        let Ok(pos) = self.destinations.search(destination) else {
            return EdgeRemoval::Absent;
        };
        let entry = self.destinations.get(pos);
        if !entry.origins().contains(origin) {
            return EdgeRemoval::Absent;
        }

        if self.destinations.len() == 1 && entry.origin_count() == 1 {
            self.destinations.remove_at(pos);
            self.top = TopDestinations::new();
            return EdgeRemoval::Emptied;
        }

        self.take_origin(pos, origin);
        if self.top.release(destination) {
            debug!(relation = %self.name, destination, "sole holder lost an origin, rescanning");
            self.top.recompute(&self.destinations);
        }
        EdgeRemoval::Removed
    }

    /// Removes every edge that touches `entity`, as destination or origin.
    ///
    /// Holder bookkeeping follows `remove_edge`, but the full rescan, if one
    /// is needed, runs once after the sweep. Returns true if anything changed.
    pub fn purge_entity(&mut self, entity: &str) -> bool {
        let mut changed = false;
        let mut rescan = false;

        if let Some(removed) = self.destinations.remove(entity) {
            changed = true;
            rescan |= self.top.release(removed.name());
        }

        let mut pos = 0;
        while pos < self.destinations.len() {
            let entry = self.destinations.get_mut(pos);
            if entry.origins_mut().remove(entity).is_none() {
                pos += 1;
                continue;
            }
            changed = true;

            let destination = entry.name().clone();
            if entry.origin_count() == 0 {
                self.destinations.remove_at(pos);
            } else {
                pos += 1;
            }
            rescan |= self.top.release(&destination);
        }

        if rescan {
            debug!(relation = %self.name, entity, "purge removed the sole holder, rescanning");
            self.top.recompute(&self.destinations);
        }
        changed
    }

    /// Removes the origin at `pos`'s destination, dropping the destination
    /// entry when its last origin goes.
    fn take_origin(&mut self, pos: usize, origin: &str) {
        let entry = self.destinations.get_mut(pos);
        entry.origins_mut().remove(origin);
        if entry.origin_count() == 0 {
            self.destinations.remove_at(pos);
        }
    }
}

/// All relations, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationCatalog {
    entries: Vec<RelationEntry>,
}

impl RelationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self, relation: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| (*entry.name).cmp(relation))
    }

    pub fn find(&self, relation: &str) -> Option<&RelationEntry> {
        self.search(relation).ok().map(|pos| &self.entries[pos])
    }

    /// Returns the position of `relation`, creating an empty entry with a
    /// zeroed aggregate if needed. The flag is true when it was created.
    pub fn get_or_create(&mut self, relation: &str) -> Result<(usize, bool), StoreError> {
        match self.search(relation) {
            Ok(pos) => Ok((pos, false)),
            Err(pos) => {
                self.entries
                    .try_reserve(1)
                    .map_err(|_| StoreError::CapacityExhausted {
                        what: "relation catalog",
                    })?;
                self.entries.insert(pos, RelationEntry::new(Name::from(relation)));
                Ok((pos, true))
            }
        }
    }

    pub(crate) fn get_mut(&mut self, pos: usize) -> &mut RelationEntry {
        &mut self.entries[pos]
    }

    pub(crate) fn find_mut(&mut self, relation: &str) -> Option<(usize, &mut RelationEntry)> {
        match self.search(relation) {
            Ok(pos) => Some((pos, &mut self.entries[pos])),
            Err(_) => None,
        }
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> RelationEntry {
        self.entries.remove(pos)
    }

    /// Drops the relation at `pos` if it has no edges.
    pub(crate) fn discard_if_empty(&mut self, pos: usize) -> bool {
        if !self.entries[pos].is_empty() {
            return false;
        }
        self.entries.remove(pos);
        true
    }

    /// Removes `relation` if present.
    pub fn remove(&mut self, relation: &str) -> Option<RelationEntry> {
        self.search(relation)
            .ok()
            .map(|pos| self.entries.remove(pos))
    }

    /// Runs `purge_entity` on every relation and drops the ones left empty.
    pub(crate) fn purge_entity(&mut self, entity: &str) -> bool {
        let mut changed = false;
        self.entries.retain_mut(|entry| {
            changed |= entry.purge_entity(entity);
            if entry.is_empty() {
                debug!(relation = %entry.name, entity, "relation emptied by entity removal");
                false
            } else {
                true
            }
        });
        changed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationEntry> + '_ {
        self.entries.iter()
    }

    pub(crate) fn as_slice(&self) -> &[RelationEntry] {
        &self.entries
    }
}
