//! Associative containers behind one uniform contract.
//!
//! This module provides two standalone map backends, both implementing the
//! same [`Map`] trait:
//!
//! - [`OrderedTreeMap`]: unbalanced binary search tree, keys compared via a
//!   total order
//! - [`BucketHashMap`]: chaining hash table, keys dispatched by hash code,
//!   growing when the load factor is exceeded
//!
//! Neither backend depends on the other. Callers that program against
//! `dyn Map<K, V>` (or a generic `M: Map<K, V>`) can swap one backend for
//! the other without changes. The only observable difference the contract
//! permits is that the tree backend rejects removal with
//! [`UnsupportedOperationError`].
//!
//! # Examples
//!
//! ## Interchangeable backends
//!
//! ```rust
//! use duomap::map::{BucketHashMap, Map, OrderedTreeMap};
//!
//! fn populate(map: &mut dyn Map<i32, &'static str>) {
//!     map.insert(1, "one");
//!     map.insert(2, "two");
//!     map.insert(1, "ONE");
//! }
//!
//! let mut tree = OrderedTreeMap::new();
//! let mut hash: BucketHashMap<i32, &'static str> = BucketHashMap::new();
//! populate(&mut tree);
//! populate(&mut hash);
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(hash.len(), 2);
//! assert_eq!(tree.get(&1), Some(&"ONE"));
//! assert_eq!(hash.get(&1), Some(&"ONE"));
//! ```
//!
//! ## Key enumeration
//!
//! ```rust
//! use duomap::map::{Map, OrderedTreeMap};
//!
//! let mut map = OrderedTreeMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//!
//! // `keys` restarts from a fresh snapshot on every call
//! let first_pass = Map::keys(&map).count();
//! let second_pass = Map::keys(&map).count();
//! assert_eq!(first_pass, 2);
//! assert_eq!(second_pass, 2);
//! ```

use std::collections::HashSet;
use std::collections::hash_set;
use std::hash::Hash;

mod error;
mod hashmap;
mod treemap;

pub use error::UnsupportedOperationError;
#[cfg(feature = "smallvec")]
pub use hashmap::InlineBucket;
pub use hashmap::{
    Bucket, BucketHashMap, BucketHashMapIntoIterator, BucketHashMapIterator, DEFAULT_MAX_LOAD,
    DEFAULT_TABLE_SIZE, DefaultHashBuilder, Entry, VecBucket,
};
pub use treemap::{OrderedTreeMap, OrderedTreeMapIntoIterator, OrderedTreeMapIterator};

// =============================================================================
// Map Contract
// =============================================================================

/// The uniform contract implemented by both map backends.
///
/// A `Map` stores at most one entry per key. Lookups on a missing key are
/// not errors; they return `None`. The removal operations are the only
/// fallible part of the contract: a backend that does not support removal
/// reports [`UnsupportedOperationError`] instead of mutating.
///
/// The trait is dyn-compatible, so backends are interchangeable behind
/// `&mut dyn Map<K, V>`.
pub trait Map<K, V> {
    /// Inserts a key-value pair, returning the replaced value if the key was
    /// already present.
    ///
    /// After this call `get(&key)` yields the new value; the length grows
    /// only when the key was fresh.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns a reference to the value for the key, or `None` if absent.
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns `true` if the map contains an entry for the key.
    fn contains_key(&self, key: &K) -> bool;

    /// Returns the number of distinct keys currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if the map contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    fn clear(&mut self);

    /// Collects every key into a [`HashSet`].
    ///
    /// The set has exactly `len()` elements and contains precisely the keys
    /// for which `contains_key` returns `true`.
    fn key_set(&self) -> HashSet<K>
    where
        K: Clone + Hash + Eq;

    /// Removes the entry for the key, returning its value.
    ///
    /// A missing key is not an error: backends that support removal return
    /// `Ok(None)`. Backends that do not support removal return
    /// [`UnsupportedOperationError`] without mutating.
    fn remove(&mut self, key: &K) -> Result<Option<V>, UnsupportedOperationError>;

    /// Removes the entry for the key only if its value equals `value`.
    ///
    /// On a value mismatch the entry is kept and a copy of the stored value
    /// is returned; on a missing key the result is `Ok(None)`.
    fn remove_matching(
        &mut self,
        key: &K,
        value: &V,
    ) -> Result<Option<V>, UnsupportedOperationError>
    where
        V: Clone + PartialEq;

    /// Returns a lazy, finite, restartable iterator over the keys.
    ///
    /// Backed by a fresh [`key_set`](Map::key_set) snapshot, so every call
    /// restarts from the map's current keys and later mutations do not
    /// affect an iterator already produced.
    fn keys(&self) -> KeysIterator<K>
    where
        K: Clone + Hash + Eq,
    {
        KeysIterator::new(self.key_set())
    }
}

// =============================================================================
// Keys Iterator
// =============================================================================

/// Iterator over a snapshot of a map's keys, in no guaranteed order.
///
/// Produced by [`Map::keys`].
pub struct KeysIterator<K> {
    keys: hash_set::IntoIter<K>,
}

impl<K> KeysIterator<K> {
    fn new(keys: HashSet<K>) -> Self {
        Self {
            keys: keys.into_iter(),
        }
    }
}

impl<K> Iterator for KeysIterator<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K> ExactSizeIterator for KeysIterator<K> {
    fn len(&self) -> usize {
        self.keys.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn exercise_contract(map: &mut dyn Map<String, i32>) {
        assert!(map.is_empty());
        assert_eq!(map.insert("a".to_string(), 1), None);
        assert_eq!(map.insert("b".to_string(), 2), None);
        assert_eq!(map.insert("a".to_string(), 3), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a".to_string()), Some(&3));
        assert!(map.contains_key(&"b".to_string()));
        assert!(!map.contains_key(&"c".to_string()));

        let keys = map.key_set();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("a"));
        assert!(keys.contains("b"));
    }

    #[rstest]
    fn test_tree_backend_satisfies_contract() {
        let mut map = OrderedTreeMap::new();
        exercise_contract(&mut map);
    }

    #[rstest]
    fn test_hash_backend_satisfies_contract() {
        let mut map: BucketHashMap<String, i32> = BucketHashMap::new();
        exercise_contract(&mut map);
    }

    #[rstest]
    fn test_keys_iterator_is_restartable() {
        let mut map: BucketHashMap<String, i32> = BucketHashMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        let contract: &dyn Map<String, i32> = &map;

        let first: Vec<String> = contract.keys().collect();
        let second: Vec<String> = contract.keys().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[rstest]
    fn test_keys_iterator_reports_length() {
        let mut map = OrderedTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let contract: &dyn Map<i32, &str> = &map;

        let iterator = contract.keys();
        assert_eq!(iterator.len(), 2);
    }
}
