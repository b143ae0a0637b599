//! Structural self-check.
//!
//! Walks the whole store and confirms the ordering, non-emptiness, and
//! aggregate invariants that every mutation is supposed to preserve. Cheap
//! enough for tests and `--verify` sessions, too slow for every command of a
//! large workload.

use crate::aggregate::TopDestinations;
use crate::error::InvariantViolation;
use crate::ordered_set::is_strictly_sorted;
use crate::store::RelationStore;

impl RelationStore {
    /// Checks every structural invariant, returning the first violation.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        if !is_strictly_sorted(self.entities.as_slice(), |e| &**e) {
            return Err(InvariantViolation::UnsortedEntities);
        }
        if !is_strictly_sorted(self.relations.as_slice(), |r| &**r.name()) {
            return Err(InvariantViolation::UnsortedRelations);
        }

        for relation in self.relations.iter() {
            let rel_name = relation.name().to_string();
            let destinations = relation.destinations();

            if destinations.is_empty() {
                return Err(InvariantViolation::EmptyRelation { relation: rel_name });
            }
            if !is_strictly_sorted(destinations.as_slice(), |d| &**d.name()) {
                return Err(InvariantViolation::UnsortedDestinations { relation: rel_name });
            }

            for entry in destinations.iter() {
                let dest_name = entry.name().to_string();
                if entry.origins().is_empty() {
                    return Err(InvariantViolation::EmptyDestination {
                        relation: rel_name,
                        destination: dest_name,
                    });
                }
                if !is_strictly_sorted(entry.origins().as_slice(), |o| &**o) {
                    return Err(InvariantViolation::UnsortedOrigins {
                        relation: rel_name,
                        destination: dest_name,
                    });
                }
                for origin in entry.origins() {
                    if !self.entities.contains(origin) || !self.entities.contains(entry.name()) {
                        return Err(InvariantViolation::DanglingEdge {
                            relation: rel_name,
                            origin: origin.to_string(),
                            destination: dest_name,
                        });
                    }
                }
            }

            let top = relation.top();
            let (expected_count, expected_holders) = TopDestinations::expected_for(destinations);
            let stored_holders: Vec<String> =
                top.sorted_holders().into_iter().map(str::to_string).collect();
            if top.max_count() != expected_count || stored_holders != expected_holders {
                return Err(InvariantViolation::StaleAggregate {
                    relation: rel_name,
                    stored_count: top.max_count(),
                    stored_holders,
                    expected_count,
                    expected_holders,
                });
            }
        }
        Ok(())
    }
}
