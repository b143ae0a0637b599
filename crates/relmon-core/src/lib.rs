//! Relmon Core - Entity and relation tracking
//!
//! This crate keeps a catalog of named entities and typed directed
//! relations between them, and answers which destinations receive the most
//! edges for each relation type.
//!
//! # Architecture
//!
//! Every level is a sorted vector searched by binary search:
//! - Entity catalog (an [`OrderedNameSet`])
//! - Relation catalog, one entry per relation name
//! - Destination index per relation, one entry per destination
//! - Origin set per destination
//!
//! Each relation also carries a [`TopDestinations`] aggregate that is
//! updated incrementally on insert and rescanned only when its sole holder
//! loses an origin.
//!
//! # Example
//!
//! ```
//! use relmon_core::RelationStore;
//!
//! let mut store = RelationStore::new();
//! for entity in ["a", "b", "c"] {
//!     store.add_entity(entity).unwrap();
//! }
//! store.add_relation("a", "b", "r1").unwrap();
//! store.add_relation("c", "b", "r1").unwrap();
//!
//! assert_eq!(store.report().to_string(), "r1 b 2; ");
//! ```

mod aggregate;
mod destination;
mod error;
mod ordered_set;
mod relation;
mod report;
mod store;
mod verify;

pub use aggregate::TopDestinations;
pub use destination::{DestinationEntry, DestinationIndex};
pub use error::{InvariantViolation, StoreError};
pub use ordered_set::{Name, OrderedNameSet};
pub use relation::{EdgeRemoval, RelationCatalog, RelationEntry};
pub use report::{Report, ReportLine};
pub use store::{RelationStore, StoreStats};
