//! Error types for the store.

use thiserror::Error;

/// Errors surfaced by mutating store operations.
///
/// Unknown entities, relations, and edges are never errors; those calls are
/// silent no-ops. The only failure is running out of memory while growing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("capacity exhausted while growing {what}")]
    CapacityExhausted { what: &'static str },
}

/// A broken structural invariant, reported by `RelationStore::verify`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("entity catalog is not strictly sorted")]
    UnsortedEntities,

    #[error("relation catalog is not strictly sorted")]
    UnsortedRelations,

    #[error("destinations of relation {relation} are not strictly sorted")]
    UnsortedDestinations { relation: String },

    #[error("origins of {destination} in relation {relation} are not strictly sorted")]
    UnsortedOrigins {
        relation: String,
        destination: String,
    },

    #[error("relation {relation} has no destinations")]
    EmptyRelation { relation: String },

    #[error("destination {destination} in relation {relation} has no origins")]
    EmptyDestination {
        relation: String,
        destination: String,
    },

    #[error("edge {origin} -> {destination} ({relation}) references an unregistered entity")]
    DanglingEdge {
        relation: String,
        origin: String,
        destination: String,
    },

    #[error(
        "aggregate of relation {relation} is stale: stored {stored_count} {stored_holders:?}, expected {expected_count} {expected_holders:?}"
    )]
    StaleAggregate {
        relation: String,
        stored_count: usize,
        stored_holders: Vec<String>,
        expected_count: usize,
        expected_holders: Vec<String>,
    },
}
