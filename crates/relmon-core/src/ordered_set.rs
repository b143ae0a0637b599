//! Sorted set of names.
//!
//! Backs both the global entity catalog and every destination's origin set.
//! Lookups are binary searches; inserts and removals shift the tail of the
//! underlying vector so the order is always ascending by bytes.

use crate::error::StoreError;
use std::rc::Rc;

/// An interned name.
///
/// The entity catalog holds the canonical allocation. Every other structure
/// that refers to an entity holds a clone of the same `Rc`.
pub type Name = Rc<str>;

/// A growable, always-sorted set of unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedNameSet {
    items: Vec<Name>,
}

impl OrderedNameSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binary-searches for `name`.
    ///
    /// `Ok(pos)` if present, `Err(pos)` with the insertion point otherwise.
    pub fn search(&self, name: &str) -> Result<usize, usize> {
        self.items.binary_search_by(|probe| (**probe).cmp(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_ok()
    }

    /// Returns the stored handle for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Name> {
        self.search(name).ok().map(|pos| &self.items[pos])
    }

    /// Inserts `name` at its sorted position.
    ///
    /// Returns `Ok(false)` if it was already present. Capacity is reserved
    /// before the set is touched, so a failed growth leaves it unchanged.
    pub fn insert(&mut self, name: Name) -> Result<bool, StoreError> {
        match self.search(&name) {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.items
                    .try_reserve(1)
                    .map_err(|_| StoreError::CapacityExhausted { what: "name set" })?;
                self.items.insert(pos, name);
                Ok(true)
            }
        }
    }

    /// Removes `name`, returning the stored handle if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Name> {
        self.search(name).ok().map(|pos| self.items.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Name> + '_ {
        self.items.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Name] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a OrderedNameSet {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Returns true if `items` is strictly ascending under `key`.
pub(crate) fn is_strictly_sorted<T, K: Ord + ?Sized>(items: &[T], key: impl Fn(&T) -> &K) -> bool {
    items.windows(2).all(|pair| key(&pair[0]) < key(&pair[1]))
}
