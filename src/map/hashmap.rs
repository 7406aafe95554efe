//! Hash map based on a chaining hash table with dynamic growth.
//!
//! This module provides [`BucketHashMap`], a mutable hash map that dispatches
//! keys to buckets by hash code and grows its table when the load factor is
//! exceeded.
//!
//! # Overview
//!
//! `BucketHashMap` stores entries in an array of buckets. A key lands in the
//! bucket at index `hash(key) mod table_length`; within a bucket, entries are
//! kept in insertion order and scanned sequentially.
//!
//! - O(1) expected get, insert, remove and `contains_key`
//! - O(bucket length) worst case when many keys collide
//! - O(1) len and `is_empty`
//!
//! After an insertion pushes the load factor (entry count / table length)
//! above `max_load`, the table doubles in length and every entry is
//! redistributed against the new length. The table never shrinks; removal
//! does not trigger resizing.
//!
//! Bucket storage is pluggable: any type implementing [`Bucket`] (append,
//! removal by predicate, iteration) can back the table. [`VecBucket`] is the
//! default; [`InlineBucket`] keeps short chains inline without a heap
//! allocation per bucket.
//!
//! # Examples
//!
//! ```rust
//! use duomap::map::BucketHashMap;
//!
//! let mut map: BucketHashMap<String, i32> = BucketHashMap::new();
//! map.insert("one".to_string(), 1);
//! map.insert("two".to_string(), 2);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.len(), 2);
//!
//! // Inserting an existing key overwrites in place
//! map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&100));
//! assert_eq!(map.len(), 2);
//! ```
//!
//! # Internal Structure
//!
//! The table upholds one invariant: every stored key appears in exactly one
//! bucket, at the index computed from the table's *current* length. A resize
//! re-establishes this for every entry by recomputing its index against the
//! doubled length.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;
use std::marker::PhantomData;

use super::Map;
use super::error::UnsupportedOperationError;

// =============================================================================
// Constants
// =============================================================================

/// Table length used by `new` and restored by `clear`.
pub const DEFAULT_TABLE_SIZE: usize = 16;

/// Load factor ceiling used when none is given.
pub const DEFAULT_MAX_LOAD: f64 = 0.75;

#[cfg(feature = "smallvec")]
const INLINE_BUCKET_CAPACITY: usize = 4;

// =============================================================================
// Default Hash Builder
// =============================================================================

/// Hash builder used when none is supplied.
///
/// When the `fxhash` feature is enabled, this is `rustc_hash::FxBuildHasher`,
/// a fast non-cryptographic hasher.
///
/// When the `ahash` feature is enabled (and `fxhash` is not), this is
/// `ahash::RandomState`.
///
/// Otherwise it is `std::collections::hash_map::RandomState`, the standard
/// library's DoS-resistant default.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// Hash builder used when none is supplied (`ahash` feature).
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = ahash::RandomState;

/// Hash builder used when none is supplied (standard library default).
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

// =============================================================================
// Entry Definition
// =============================================================================

/// A key-value pair stored inside a bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The entry's key.
    pub key: K,
    /// The entry's value.
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates a new entry.
    #[inline]
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

// =============================================================================
// Bucket Contract
// =============================================================================

/// Storage backing a single hash-table bucket.
///
/// A bucket is anything that supports appending an entry, removing an entry
/// by predicate, and iterating its entries in insertion order. The table
/// creates buckets through [`Default`], so implementors double as their own
/// factory.
///
/// Provided `find`/`find_mut` locate an entry by (borrowed) key with a
/// sequential scan, which is how every bucket-backed operation resolves
/// collisions.
pub trait Bucket<K, V>: Default {
    /// Borrowing iterator over the bucket's entries.
    type Iter<'a>: Iterator<Item = &'a Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Mutably borrowing iterator over the bucket's entries.
    type IterMut<'a>: Iterator<Item = &'a mut Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Owning iterator that drains the bucket, used during redistribution.
    type IntoEntries: Iterator<Item = Entry<K, V>>;

    /// Appends an entry to the end of the bucket.
    fn append(&mut self, entry: Entry<K, V>);

    /// Removes and returns the first entry matching the predicate.
    fn remove_where<F>(&mut self, predicate: F) -> Option<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool;

    /// Iterates the entries in insertion order.
    fn entries(&self) -> Self::Iter<'_>;

    /// Mutably iterates the entries in insertion order.
    fn entries_mut(&mut self) -> Self::IterMut<'_>;

    /// Consumes the bucket, yielding its entries in insertion order.
    fn into_entries(self) -> Self::IntoEntries;

    /// Returns the number of entries in the bucket.
    fn len(&self) -> usize;

    /// Returns `true` if the bucket holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry with the given key, if present.
    fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries().find(|entry| entry.key.borrow() == key)
    }

    /// Returns the entry with the given key mutably, if present.
    fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries_mut().find(|entry| entry.key.borrow() == key)
    }
}

/// Bucket storage backed by a `Vec`. The default.
#[derive(Clone, Debug)]
pub struct VecBucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for VecBucket<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Bucket<K, V> for VecBucket<K, V> {
    type Iter<'a>
        = std::slice::Iter<'a, Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    type IterMut<'a>
        = std::slice::IterMut<'a, Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    type IntoEntries = std::vec::IntoIter<Entry<K, V>>;

    fn append(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    fn remove_where<F>(&mut self, mut predicate: F) -> Option<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        let position = self.entries.iter().position(|entry| predicate(entry))?;
        Some(self.entries.remove(position))
    }

    fn entries(&self) -> Self::Iter<'_> {
        self.entries.iter()
    }

    fn entries_mut(&mut self) -> Self::IterMut<'_> {
        self.entries.iter_mut()
    }

    fn into_entries(self) -> Self::IntoEntries {
        self.entries.into_iter()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Bucket storage that keeps short chains inline.
///
/// Backed by a `SmallVec`, so buckets holding at most four entries need no
/// heap allocation. With a healthy load factor nearly every bucket stays
/// within the inline capacity.
#[cfg(feature = "smallvec")]
#[derive(Clone, Debug)]
pub struct InlineBucket<K, V> {
    entries: smallvec::SmallVec<[Entry<K, V>; INLINE_BUCKET_CAPACITY]>,
}

#[cfg(feature = "smallvec")]
impl<K, V> Default for InlineBucket<K, V> {
    fn default() -> Self {
        Self {
            entries: smallvec::SmallVec::new(),
        }
    }
}

#[cfg(feature = "smallvec")]
impl<K, V> Bucket<K, V> for InlineBucket<K, V> {
    type Iter<'a>
        = std::slice::Iter<'a, Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    type IterMut<'a>
        = std::slice::IterMut<'a, Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    type IntoEntries = smallvec::IntoIter<[Entry<K, V>; INLINE_BUCKET_CAPACITY]>;

    fn append(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    fn remove_where<F>(&mut self, mut predicate: F) -> Option<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        let position = self.entries.iter().position(|entry| predicate(entry))?;
        Some(self.entries.remove(position))
    }

    fn entries(&self) -> Self::Iter<'_> {
        self.entries.iter()
    }

    fn entries_mut(&mut self) -> Self::IterMut<'_> {
        self.entries.iter_mut()
    }

    fn into_entries(self) -> Self::IntoEntries {
        self.entries.into_iter()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// BucketHashMap Definition
// =============================================================================

/// A mutable hash map based on a chaining hash table.
///
/// Keys must implement `Hash + Eq`. The table doubles in length whenever an
/// insertion pushes the load factor above `max_load`; it never shrinks.
///
/// The bucket storage `B` and the hash builder `S` are pluggable;
/// [`VecBucket`] and [`DefaultHashBuilder`] are used unless specified.
///
/// # Time Complexity
///
/// | Operation      | Complexity                     |
/// |----------------|--------------------------------|
/// | `new`          | O(table length)                |
/// | `get`          | O(1) expected, O(chain) worst  |
/// | `insert`       | O(1) amortized                 |
/// | `remove`       | O(1) expected, O(chain) worst  |
/// | `contains_key` | O(1) expected, O(chain) worst  |
/// | `len`          | O(1)                           |
/// | `is_empty`     | O(1)                           |
///
/// # Examples
///
/// ```rust
/// use duomap::map::BucketHashMap;
///
/// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
/// map.insert("answer", 42);
/// assert_eq!(map.get("answer"), Some(&42));
/// assert_eq!(map.remove("answer"), Some(42));
/// assert_eq!(map.remove("answer"), None);
/// ```
pub struct BucketHashMap<K, V, B = VecBucket<K, V>, S = DefaultHashBuilder> {
    /// Buckets, indexed by `hash(key) mod table.len()`
    table: Vec<B>,
    /// Total entries across all buckets
    count: usize,
    /// Upper bound on `count / table.len()` tolerated without growth
    max_load: f64,
    hash_builder: S,
    entry_marker: PhantomData<Entry<K, V>>,
}

impl<K, V, B: Bucket<K, V>, S: BuildHasher + Default> BucketHashMap<K, V, B, S> {
    /// Creates a new empty map with the default table size and load factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let map: BucketHashMap<String, i32> = BucketHashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.bucket_count(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity_and_load_factor(DEFAULT_TABLE_SIZE, DEFAULT_MAX_LOAD)
    }

    /// Creates a new empty map with the given initial table length.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let map: BucketHashMap<String, i32> = BucketHashMap::with_capacity(64);
    /// assert_eq!(map.bucket_count(), 64);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_MAX_LOAD)
    }

    /// Creates a new empty map with the given initial table length and load
    /// factor ceiling.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero, or if `max_load` is not a positive
    /// finite number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let map: BucketHashMap<String, i32> =
    ///     BucketHashMap::with_capacity_and_load_factor(8, 0.5);
    /// assert_eq!(map.bucket_count(), 8);
    /// assert_eq!(map.max_load(), 0.5);
    /// ```
    #[must_use]
    pub fn with_capacity_and_load_factor(capacity: usize, max_load: f64) -> Self {
        assert!(capacity > 0, "table capacity must be positive");
        assert!(
            max_load.is_finite() && max_load > 0.0,
            "load factor must be a positive finite number"
        );
        Self {
            table: Self::allocate_table(capacity),
            count: 0,
            max_load,
            hash_builder: S::default(),
            entry_marker: PhantomData,
        }
    }
}

impl<K, V, B: Bucket<K, V>, S> BucketHashMap<K, V, B, S> {
    /// Creates a new empty map using the given hash builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    /// use duomap::map::{BucketHashMap, VecBucket};
    ///
    /// let map: BucketHashMap<String, i32, VecBucket<String, i32>, RandomState> =
    ///     BucketHashMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: Self::allocate_table(DEFAULT_TABLE_SIZE),
            count: 0,
            max_load: DEFAULT_MAX_LOAD,
            hash_builder,
            entry_marker: PhantomData,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the current table length (the number of buckets).
    ///
    /// Grows by doubling; never shrinks while entries are inserted or
    /// removed.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    /// Returns the load factor ceiling.
    #[inline]
    #[must_use]
    pub const fn max_load(&self) -> f64 {
        self.max_load
    }

    /// Removes all entries and resets the table to the default length.
    ///
    /// A custom initial table length is discarded; the load factor ceiling
    /// and the hash builder are kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::with_capacity(64);
    /// map.insert("a", 1);
    /// map.clear();
    ///
    /// assert!(map.is_empty());
    /// assert_eq!(map.bucket_count(), 16);
    /// ```
    pub fn clear(&mut self) {
        self.table = Self::allocate_table(DEFAULT_TABLE_SIZE);
        self.count = 0;
    }

    /// Returns an iterator over the entries, in table order and then bucket
    /// insertion order. No overall order is guaranteed.
    #[must_use]
    pub fn iter(&self) -> BucketHashMapIterator<'_, K, V, B> {
        BucketHashMapIterator {
            buckets: self.table.iter(),
            current: None,
            remaining: self.count,
        }
    }

    /// Returns an iterator over the keys, in no guaranteed order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values, in no guaranteed order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Collects every key into a [`HashSet`].
    ///
    /// Scans every bucket in table order; the set has exactly `len()`
    /// elements because every stored key appears in exactly one bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let keys = map.key_set();
    /// assert_eq!(keys.len(), 2);
    /// assert!(keys.contains("a"));
    /// ```
    #[must_use]
    pub fn key_set(&self) -> HashSet<K>
    where
        K: Clone + Hash + Eq,
    {
        let mut keys = HashSet::with_capacity(self.count);
        for bucket in &self.table {
            for entry in bucket.entries() {
                keys.insert(entry.key.clone());
            }
        }
        keys
    }

    /// Allocates a table of empty buckets.
    fn allocate_table(capacity: usize) -> Vec<B> {
        let mut table = Vec::with_capacity(capacity);
        table.resize_with(capacity, B::default);
        table
    }
}

impl<K: Hash + Eq, V, B: Bucket<K, V>, S: BuildHasher> BucketHashMap<K, V, B, S> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let map: BucketHashMap<&str, i32> = BucketHashMap::singleton("key", 42);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("key"), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self
    where
        S: Default,
    {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash`
    /// and `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Complexity
    ///
    /// O(1) expected, O(chain length) worst case
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<String, i32> = BucketHashMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key, self.table.len());
        self.table[index].find(key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key, self.table.len());
        self.table[index].find_mut(key).map(|entry| &mut entry.value)
    }

    /// Returns `true` if the map contains an entry for the key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key, self.table.len());
        self.table[index].find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present, the stored value is overwritten in
    /// place and the old value is returned; the count does not change and no
    /// resize check runs. Otherwise the entry is appended to its bucket, the
    /// count is incremented, and the table grows if the load factor now
    /// exceeds `max_load`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 3), Some(1));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("a"), Some(&3));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key, self.table.len());
        if let Some(entry) = self.table[index].find_mut(&key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.table[index].append(Entry::new(key, value));
        self.count += 1;
        self.grow_if_needed();
        None
    }

    /// Removes the entry for the key, returning its value.
    ///
    /// An absent key is not an error; the call is a no-op returning `None`.
    /// Removal never shrinks the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
    /// map.insert("a", 1);
    ///
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// assert_eq!(map.len(), 0);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key, self.table.len());
        let removed = self.table[index].remove_where(|entry| entry.key.borrow() == key)?;
        self.count -= 1;
        Some(removed.value)
    }

    /// Removes the entry for the key only if its value equals `value`.
    ///
    /// Returns `None` if the key is absent. If the key is present but the
    /// stored value differs, the entry is left untouched and a copy of the
    /// stored value is returned, so the caller can observe what blocked the
    /// removal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::BucketHashMap;
    ///
    /// let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
    /// map.insert("a", 1);
    ///
    /// // Mismatched value: no removal, current value reported
    /// assert_eq!(map.remove_matching("a", &9), Some(1));
    /// assert_eq!(map.len(), 1);
    ///
    /// // Matching value: removed
    /// assert_eq!(map.remove_matching("a", &1), Some(1));
    /// assert_eq!(map.len(), 0);
    /// ```
    pub fn remove_matching<Q>(&mut self, key: &Q, value: &V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + PartialEq,
    {
        let index = self.bucket_index(key, self.table.len());
        let current = self.table[index].find(key).map(|entry| entry.value.clone())?;
        if &current == value {
            let removed = self.table[index].remove_where(|entry| entry.key.borrow() == key)?;
            self.count -= 1;
            Some(removed.value)
        } else {
            Some(current)
        }
    }

    /// Computes the bucket index for a key against the given table length.
    #[allow(clippy::cast_possible_truncation)]
    fn bucket_index<Q>(&self, key: &Q, table_length: usize) -> usize
    where
        Q: Hash + ?Sized,
    {
        // The remainder is below the table length, so the cast is lossless.
        (self.hash_builder.hash_one(key) % table_length as u64) as usize
    }

    /// Doubles the table if the load factor exceeds `max_load`.
    ///
    /// Runs after every insertion of a fresh key. A single doubling restores
    /// the invariant for any load factor of 0.5 or above; smaller ceilings
    /// converge over subsequent insertions.
    #[allow(clippy::cast_precision_loss)]
    fn grow_if_needed(&mut self) {
        let load = self.count as f64 / self.table.len() as f64;
        if load > self.max_load {
            self.grow_to(self.table.len() * 2);
        }
    }

    /// Reallocates the table and redistributes every entry against the new
    /// length.
    fn grow_to(&mut self, new_capacity: usize) {
        let old_table = std::mem::replace(&mut self.table, Self::allocate_table(new_capacity));
        for bucket in old_table {
            for entry in bucket.into_entries() {
                let index = self.bucket_index(&entry.key, new_capacity);
                self.table[index].append(entry);
            }
        }
    }
}

// =============================================================================
// Map Contract Implementation
// =============================================================================

impl<K: Hash + Eq, V, B: Bucket<K, V>, S: BuildHasher> Map<K, V> for BucketHashMap<K, V, B, S> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Self::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        Self::contains_key(self, key)
    }

    fn len(&self) -> usize {
        self.count
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn key_set(&self) -> HashSet<K>
    where
        K: Clone + Hash + Eq,
    {
        Self::key_set(self)
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, UnsupportedOperationError> {
        Ok(Self::remove(self, key))
    }

    fn remove_matching(
        &mut self,
        key: &K,
        value: &V,
    ) -> Result<Option<V>, UnsupportedOperationError>
    where
        V: Clone + PartialEq,
    {
        Ok(Self::remove_matching(self, key, value))
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`BucketHashMap`], in table order and then
/// bucket insertion order.
pub struct BucketHashMapIterator<'a, K: 'a, V: 'a, B: Bucket<K, V>> {
    buckets: std::slice::Iter<'a, B>,
    current: Option<B::Iter<'a>>,
    remaining: usize,
}

impl<'a, K: 'a, V: 'a, B: Bucket<K, V>> Iterator for BucketHashMapIterator<'a, K, V, B> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entries) = self.current.as_mut()
                && let Some(entry) = entries.next()
            {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.current = Some(self.buckets.next()?.entries());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, B: Bucket<K, V>> ExactSizeIterator for BucketHashMapIterator<'_, K, V, B> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Owning iterator over a [`BucketHashMap`].
pub struct BucketHashMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for BucketHashMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for BucketHashMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, B: Bucket<K, V>, S: BuildHasher + Default> Default for BucketHashMap<K, V, B, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, B: Bucket<K, V>, S: BuildHasher + Default> FromIterator<(K, V)>
    for BucketHashMap<K, V, B, S>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterable: I) -> Self {
        let mut map = Self::new();
        map.extend(iterable);
        map
    }
}

impl<K: Hash + Eq, V, B: Bucket<K, V>, S: BuildHasher> Extend<(K, V)>
    for BucketHashMap<K, V, B, S>
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V, B: Bucket<K, V>, S> IntoIterator for BucketHashMap<K, V, B, S> {
    type Item = (K, V);
    type IntoIter = BucketHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.count);
        for bucket in self.table {
            for entry in bucket.into_entries() {
                entries.push((entry.key, entry.value));
            }
        }
        BucketHashMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V, B: Bucket<K, V>, S> IntoIterator for &'a BucketHashMap<K, V, B, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = BucketHashMapIterator<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq, B: Bucket<K, V>, S: BuildHasher> PartialEq
    for BucketHashMap<K, V, B, S>
{
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq, B: Bucket<K, V>, S: BuildHasher> Eq for BucketHashMap<K, V, B, S> {}

impl<K: fmt::Debug, V: fmt::Debug, B: Bucket<K, V>, S> fmt::Debug for BucketHashMap<K, V, B, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, B: Bucket<K, V>, S> fmt::Display
    for BucketHashMap<K, V, B, S>
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, B, S> serde::Serialize for BucketHashMap<K, V, B, S>
where
    K: serde::Serialize,
    V: serde::Serialize,
    B: Bucket<K, V>,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct BucketHashMapVisitor<K, V, B, S> {
    map_marker: PhantomData<BucketHashMap<K, V, B, S>>,
}

#[cfg(feature = "serde")]
impl<K, V, B, S> BucketHashMapVisitor<K, V, B, S> {
    const fn new() -> Self {
        Self {
            map_marker: PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, B, S> serde::de::Visitor<'de> for BucketHashMapVisitor<K, V, B, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
    B: Bucket<K, V>,
    S: BuildHasher + Default,
{
    type Value = BucketHashMap<K, V, B, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = BucketHashMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, B, S> serde::Deserialize<'de> for BucketHashMap<K, V, B, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
    B: Bucket<K, V>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(BucketHashMapVisitor::new())
    }
}

// =============================================================================
// Compile-Time Assertions
// =============================================================================

static_assertions::assert_impl_all!(BucketHashMap<i32, String>: Send, Sync);
static_assertions::assert_impl_all!(BucketHashMap<String, Vec<u8>>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Bucket Tests
    // =========================================================================

    #[rstest]
    fn test_vec_bucket_append_and_find() {
        let mut bucket: VecBucket<i32, &str> = VecBucket::default();
        assert!(bucket.is_empty());

        bucket.append(Entry::new(42, "answer"));
        bucket.append(Entry::new(7, "seven"));

        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.find(&42).map(|entry| entry.value), Some("answer"));
        assert_eq!(bucket.find(&0), None);
    }

    #[rstest]
    fn test_vec_bucket_preserves_insertion_order() {
        let mut bucket: VecBucket<i32, i32> = VecBucket::default();
        for index in 0..5 {
            bucket.append(Entry::new(index, index * 10));
        }

        let keys: Vec<i32> = bucket.entries().map(|entry| entry.key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn test_vec_bucket_remove_where() {
        let mut bucket: VecBucket<i32, &str> = VecBucket::default();
        bucket.append(Entry::new(1, "one"));
        bucket.append(Entry::new(2, "two"));

        let removed = bucket.remove_where(|entry| entry.key == 1);
        assert_eq!(removed, Some(Entry::new(1, "one")));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.remove_where(|entry| entry.key == 1), None);
    }

    #[cfg(feature = "smallvec")]
    #[rstest]
    fn test_inline_bucket_behaves_like_vec_bucket() {
        let mut bucket: InlineBucket<i32, &str> = InlineBucket::default();
        bucket.append(Entry::new(1, "one"));
        bucket.append(Entry::new(2, "two"));

        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.find(&2).map(|entry| entry.value), Some("two"));

        let removed = bucket.remove_where(|entry| entry.key == 2);
        assert_eq!(removed, Some(Entry::new(2, "two")));
        assert_eq!(bucket.len(), 1);
    }

    #[cfg(feature = "smallvec")]
    #[rstest]
    fn test_inline_bucket_spills_past_inline_capacity() {
        let mut bucket: InlineBucket<usize, usize> = InlineBucket::default();
        for index in 0..(INLINE_BUCKET_CAPACITY * 2) {
            bucket.append(Entry::new(index, index));
        }

        assert_eq!(bucket.len(), INLINE_BUCKET_CAPACITY * 2);
        for index in 0..(INLINE_BUCKET_CAPACITY * 2) {
            assert!(bucket.find(&index).is_some());
        }
    }

    // =========================================================================
    // Growth Tests
    // =========================================================================

    #[rstest]
    fn test_no_growth_at_load_factor_boundary() {
        // 12/16 = 0.75 does not exceed the ceiling
        let mut map: BucketHashMap<i32, i32> = BucketHashMap::new();
        for index in 0..12 {
            map.insert(index, index);
        }
        assert_eq!(map.bucket_count(), 16);
    }

    #[rstest]
    fn test_growth_doubles_table_length() {
        // The 13th insertion pushes 13/16 above 0.75
        let mut map: BucketHashMap<i32, i32> = BucketHashMap::new();
        for index in 0..13 {
            map.insert(index, index);
        }
        assert_eq!(map.bucket_count(), 32);
        assert_eq!(map.len(), 13);
    }

    #[rstest]
    fn test_growth_preserves_every_entry() {
        let mut map: BucketHashMap<i32, i32> = BucketHashMap::with_capacity(2);
        for index in 0..100 {
            map.insert(index, index * 2);
        }

        assert_eq!(map.len(), 100);
        for index in 0..100 {
            assert_eq!(map.get(&index), Some(&(index * 2)));
        }
    }

    #[rstest]
    fn test_update_never_triggers_growth() {
        let mut map: BucketHashMap<&str, i32> = BucketHashMap::with_capacity(1);
        map.insert("key", 0);
        let table_length = map.bucket_count();

        for round in 0..50 {
            map.insert("key", round);
        }
        assert_eq!(map.bucket_count(), table_length);
        assert_eq!(map.len(), 1);
    }

    #[rstest]
    fn test_remove_never_shrinks_table() {
        let mut map: BucketHashMap<i32, i32> = BucketHashMap::new();
        for index in 0..13 {
            map.insert(index, index);
        }
        let grown = map.bucket_count();

        for index in 0..13 {
            map.remove(&index);
        }
        assert_eq!(map.bucket_count(), grown);
        assert!(map.is_empty());
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(16)]
    #[case(64)]
    fn test_custom_capacity_round_trip(#[case] capacity: usize) {
        let mut map: BucketHashMap<i32, i32> = BucketHashMap::with_capacity(capacity);
        for index in 0..40 {
            map.insert(index, index);
        }
        for index in 0..40 {
            assert_eq!(map.get(&index), Some(&index));
        }
    }

    #[rstest]
    #[should_panic(expected = "table capacity must be positive")]
    fn test_zero_capacity_is_rejected() {
        let _map: BucketHashMap<i32, i32> = BucketHashMap::with_capacity(0);
    }

    #[rstest]
    #[should_panic(expected = "load factor must be a positive finite number")]
    fn test_non_finite_load_factor_is_rejected() {
        let _map: BucketHashMap<i32, i32> =
            BucketHashMap::with_capacity_and_load_factor(16, f64::NAN);
    }

    // =========================================================================
    // Removal Tests
    // =========================================================================

    #[rstest]
    fn test_remove_missing_key_is_noop() {
        let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
        assert_eq!(map.remove("missing"), None);
        assert_eq!(map.len(), 0);
    }

    #[rstest]
    fn test_remove_matching_mismatch_keeps_entry() {
        let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
        map.insert("k", 5);

        assert_eq!(map.remove_matching("k", &9), Some(5));
        assert_eq!(map.get("k"), Some(&5));
        assert_eq!(map.len(), 1);
    }

    #[rstest]
    fn test_remove_matching_absent_key() {
        let mut map: BucketHashMap<&str, i32> = BucketHashMap::new();
        assert_eq!(map.remove_matching("k", &5), None);
    }

    // =========================================================================
    // Clear Tests
    // =========================================================================

    #[rstest]
    fn test_clear_restores_default_table_and_keeps_max_load() {
        let mut map: BucketHashMap<i32, i32> =
            BucketHashMap::with_capacity_and_load_factor(64, 0.5);
        for index in 0..10 {
            map.insert(index, index);
        }

        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.bucket_count(), DEFAULT_TABLE_SIZE);
        assert_eq!(map.max_load(), 0.5);
        assert_eq!(map.get(&3), None);
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_hashmap() {
        let map: BucketHashMap<i32, String> = BucketHashMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    #[rstest]
    fn test_display_single_element_hashmap() {
        let map: BucketHashMap<i32, &str> = BucketHashMap::singleton(1, "one");
        assert_eq!(format!("{map}"), "{1: one}");
    }

    #[rstest]
    fn test_debug_format() {
        let map: BucketHashMap<i32, &str> = BucketHashMap::singleton(1, "one");
        assert_eq!(format!("{map:?}"), "{1: \"one\"}");
    }

    // =========================================================================
    // Trait Implementation Tests
    // =========================================================================

    #[rstest]
    fn test_eq_ignores_insertion_order() {
        let first: BucketHashMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
        let second: BucketHashMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_into_iter_yields_every_entry() {
        let map: BucketHashMap<i32, i32> = (0..20).map(|index| (index, index)).collect();
        let mut entries: Vec<(i32, i32)> = map.into_iter().collect();
        entries.sort_unstable();

        let expected: Vec<(i32, i32)> = (0..20).map(|index| (index, index)).collect();
        assert_eq!(entries, expected);
    }

    #[rstest]
    fn test_iter_is_exact_size() {
        let map: BucketHashMap<i32, i32> = (0..5).map(|index| (index, index)).collect();
        let mut iterator = map.iter();
        assert_eq!(iterator.len(), 5);
        iterator.next();
        assert_eq!(iterator.len(), 4);
    }

    #[cfg(feature = "smallvec")]
    #[rstest]
    fn test_inline_bucket_backed_map() {
        use crate::map::DefaultHashBuilder;

        let mut map: BucketHashMap<i32, i32, InlineBucket<i32, i32>, DefaultHashBuilder> =
            BucketHashMap::new();
        for index in 0..50 {
            map.insert(index, index);
        }

        assert_eq!(map.len(), 50);
        for index in 0..50 {
            assert_eq!(map.get(&index), Some(&index));
        }
    }

    // =========================================================================
    // Contract Tests
    // =========================================================================

    #[rstest]
    fn test_remove_through_contract_succeeds() {
        let mut map: BucketHashMap<i32, &str> = BucketHashMap::singleton(1, "one");
        let contract: &mut dyn Map<i32, &str> = &mut map;

        assert_eq!(contract.remove(&1), Ok(Some("one")));
        assert_eq!(contract.remove(&1), Ok(None));
    }

    #[rstest]
    fn test_key_set_matches_length() {
        let mut map: BucketHashMap<i32, &str> = BucketHashMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        map.insert(1, "ONE");

        let keys = map.key_set();
        assert_eq!(keys.len(), map.len());
        assert!(keys.contains(&1));
        assert!(keys.contains(&2));
    }
}
