//! The relation store.
//!
//! `RelationStore` bundles the entity catalog and the relation catalog and
//! is the only thing callers mutate. Every operation runs to completion
//! before returning; there is no internal sharing or locking.

use crate::aggregate::TopDestinations;
use crate::error::StoreError;
use crate::ordered_set::{Name, OrderedNameSet};
use crate::relation::{EdgeRemoval, RelationCatalog, RelationEntry};
use crate::report::{Report, ReportLine};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::{debug, trace};

/// Entities plus typed directed relations between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationStore {
    pub(crate) entities: OrderedNameSet,
    pub(crate) relations: RelationCatalog,
}

impl RelationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity`. Returns false if it was already known.
    pub fn add_entity(&mut self, entity: &str) -> Result<bool, StoreError> {
        if self.entities.contains(entity) {
            trace!(entity, "entity already registered");
            return Ok(false);
        }
        self.entities.insert(Name::from(entity))?;
        debug!(entity, "entity added");
        Ok(true)
    }

    /// Removes `entity` and every edge it takes part in.
    ///
    /// Relations left without edges are dropped. Returns false if the
    /// entity was not registered.
    pub fn delete_entity(&mut self, entity: &str) -> bool {
        if !self.entities.contains(entity) {
            trace!(entity, "delete of unknown entity ignored");
            return false;
        }
        let touched = self.relations.purge_entity(entity);
        self.entities.remove(entity);
        debug!(entity, edges_removed = touched, "entity deleted");
        true
    }

    /// Adds the edge `origin -> destination` under `relation`.
    ///
    /// Both endpoints must be registered entities; otherwise the call does
    /// nothing. Adding an existing edge does nothing. Returns true if the
    /// edge is new.
    pub fn add_relation(
        &mut self,
        origin: &str,
        destination: &str,
        relation: &str,
    ) -> Result<bool, StoreError> {
        let (Some(origin), Some(destination)) =
            (self.entities.get(origin), self.entities.get(destination))
        else {
            trace!(origin, destination, relation, "edge with unknown endpoint ignored");
            return Ok(false);
        };
        let (origin, destination) = (origin.clone(), destination.clone());

        let (pos, _) = self.relations.get_or_create(relation)?;
        let result = self.relations.get_mut(pos).insert_edge(&origin, &destination);
        if result.is_err() {
            self.relations.discard_if_empty(pos);
        }

        let added = result?;
        if added {
            debug!(%origin, %destination, relation, "edge added");
        } else {
            trace!(%origin, %destination, relation, "edge already present");
        }
        Ok(added)
    }

    /// Removes the edge `origin -> destination` under `relation`.
    ///
    /// Returns false if any part of the edge is unknown.
    pub fn delete_relation(&mut self, origin: &str, destination: &str, relation: &str) -> bool {
        let Some((pos, entry)) = self.relations.find_mut(relation) else {
            trace!(relation, "delete on unknown relation ignored");
            return false;
        };
        match entry.remove_edge(origin, destination) {
            EdgeRemoval::Absent => {
                trace!(origin, destination, relation, "delete of missing edge ignored");
                false
            }
            EdgeRemoval::Removed => {
                debug!(origin, destination, relation, "edge deleted");
                true
            }
            EdgeRemoval::Emptied => {
                self.relations.remove_at(pos);
                debug!(origin, destination, relation, "last edge deleted, relation dropped");
                true
            }
        }
    }

    /// Builds the per-relation top-destination report.
    pub fn report(&self) -> Report {
        let lines = self
            .relations
            .iter()
            .filter(|entry| !entry.top().holders().is_empty())
            .map(|entry| ReportLine {
                relation: entry.name().to_string(),
                holders: entry
                    .top()
                    .sorted_holders()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                count: entry.top().max_count(),
            })
            .collect();
        Report { lines }
    }

    /// Writes the text report, newline terminated.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.report())
    }

    pub fn contains_entity(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    /// Registered entities in ascending order.
    pub fn entities(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn has_relation(&self, origin: &str, destination: &str, relation: &str) -> bool {
        self.relations
            .find(relation)
            .is_some_and(|entry| entry.contains_edge(origin, destination))
    }

    /// Names of relations that currently have edges, ascending.
    pub fn relation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.relations.iter().map(|r| r.name().as_ref())
    }

    pub fn relation(&self, relation: &str) -> Option<&RelationEntry> {
        self.relations.find(relation)
    }

    pub fn top_destinations(&self, relation: &str) -> Option<&TopDestinations> {
        self.relations.find(relation).map(|r| r.top())
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entities: self.entities.len(),
            relations: self.relations.len(),
            destinations: self.relations.iter().map(|r| r.destinations().len()).sum(),
            edges: self.relations.iter().map(|r| r.edge_count()).sum(),
        }
    }
}

/// Store size counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub entities: usize,
    pub relations: usize,
    pub destinations: usize,
    pub edges: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entities: &[&str]) -> RelationStore {
        let mut store = RelationStore::new();
        for entity in entities {
            store.add_entity(entity).unwrap();
        }
        store
    }

    fn report_text(store: &RelationStore) -> String {
        store.report().to_string()
    }

    #[test]
    fn test_empty_store_reports_none() {
        let store = RelationStore::new();
        assert_eq!(report_text(&store), "none");
    }

    #[test]
    fn test_add_entity_idempotent() {
        let mut store = RelationStore::new();
        assert!(store.add_entity("a").unwrap());
        assert!(!store.add_entity("a").unwrap());
        assert_eq!(store.entities().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_two_origins_one_destination() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r1").unwrap();
        store.add_relation("c", "b", "r1").unwrap();
        assert_eq!(report_text(&store), "r1 b 2; ");
    }

    #[test]
    fn test_delete_relation_keeps_holder() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r1").unwrap();
        store.add_relation("c", "b", "r1").unwrap();
        assert!(store.delete_relation("a", "b", "r1"));
        assert_eq!(report_text(&store), "r1 b 1; ");
    }

    #[test]
    fn test_delete_destination_entity_drops_relation() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r1").unwrap();
        store.add_relation("c", "b", "r1").unwrap();
        store.delete_relation("a", "b", "r1");
        assert!(store.delete_entity("b"));
        assert_eq!(report_text(&store), "none");
        assert_eq!(store.stats().relations, 0);
    }

    #[test]
    fn test_unknown_endpoint_is_noop() {
        let mut store = store_with(&["a"]);
        assert!(!store.add_relation("a", "ghost", "r").unwrap());
        assert!(!store.add_relation("ghost", "a", "r").unwrap());
        assert_eq!(store.relation_names().count(), 0);
    }

    #[test]
    fn test_delete_unknowns_are_noops() {
        let mut store = store_with(&["a", "b"]);
        store.add_relation("a", "b", "r").unwrap();
        let before = store.clone();

        assert!(!store.delete_relation("a", "b", "other"));
        assert!(!store.delete_relation("b", "a", "r"));
        assert!(!store.delete_relation("a", "zzz", "r"));
        assert!(!store.delete_entity("zzz"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_then_delete_restores_state() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r").unwrap();
        let before = store.clone();

        store.add_relation("c", "a", "s").unwrap();
        store.add_relation("c", "b", "r").unwrap();
        store.delete_relation("c", "b", "r");
        store.delete_relation("c", "a", "s");
        assert_eq!(store, before);
    }

    #[test]
    fn test_report_orders_relations_and_holders() {
        let mut store = store_with(&["a", "b", "c", "d"]);
        store.add_relation("a", "d", "zeta").unwrap();
        store.add_relation("a", "c", "zeta").unwrap();
        store.add_relation("b", "a", "alpha").unwrap();
        store.add_relation("c", "a", "alpha").unwrap();
        store.add_relation("d", "b", "alpha").unwrap();
        assert_eq!(report_text(&store), "alpha a 2; zeta c d 1; ");
    }

    #[test]
    fn test_readd_after_delete_counts_once() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r").unwrap();
        store.add_relation("a", "c", "r").unwrap();
        store.add_relation("b", "c", "r").unwrap();
        store.delete_relation("a", "c", "r");
        assert_eq!(report_text(&store), "r b c 1; ");

        store.add_relation("a", "c", "r").unwrap();
        assert_eq!(report_text(&store), "r c 2; ");
    }

    #[test]
    fn test_entity_names_are_shared() {
        let mut store = store_with(&["a", "b"]);
        store.add_relation("a", "b", "r").unwrap();

        let canonical = store.entities.get("a").unwrap().clone();
        let entry = store.relation("r").unwrap().destinations().find("b").unwrap();
        let origin = entry.origins().get("a").unwrap();
        assert!(std::rc::Rc::ptr_eq(&canonical, origin));
    }

    #[test]
    fn test_stats() {
        let mut store = store_with(&["a", "b", "c"]);
        store.add_relation("a", "b", "r").unwrap();
        store.add_relation("c", "b", "r").unwrap();
        store.add_relation("a", "c", "s").unwrap();
        assert_eq!(
            store.stats(),
            StoreStats {
                entities: 3,
                relations: 2,
                destinations: 2,
                edges: 3,
            }
        );
    }

    #[test]
    fn test_write_report() {
        let mut store = store_with(&["a", "b"]);
        let mut out = Vec::new();
        store.write_report(&mut out).unwrap();
        store.add_relation("a", "b", "r").unwrap();
        store.write_report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "none\nr b 1; \n");
    }
}
