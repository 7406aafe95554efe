//! Ordered map based on an unbalanced binary search tree.
//!
//! This module provides [`OrderedTreeMap`], a mutable ordered map whose
//! entries are stored in a plain binary search tree.
//!
//! # Overview
//!
//! `OrderedTreeMap` keeps its keys ordered by `Ord` and performs every lookup
//! and insertion as a binary-search descent from the root. The tree is never
//! rebalanced.
//!
//! - O(h) get, insert and `contains_key`, where h is the tree height
//! - O(1) len and `is_empty`
//! - O(N) ordered iteration
//!
//! With random insertion order the height stays near log N; an adversarial
//! (already sorted) insertion order degrades the tree to a linked list and
//! every descent to O(N).
//!
//! Removal is intentionally not part of this backend. The [`Map`] contract
//! implementation reports [`UnsupportedOperationError`] for both `remove`
//! variants.
//!
//! # Examples
//!
//! ```rust
//! use duomap::map::OrderedTreeMap;
//!
//! let mut map = OrderedTreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! // Entries iterate in sorted key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```
//!
//! # Internal Structure
//!
//! Every node exclusively owns its two optional children, and the map
//! exclusively owns the root. The tree maintains the search invariant: for
//! every node, all keys in its left subtree compare less than the node's key
//! and all keys in its right subtree compare greater. Equal keys never create
//! a second node; they update the stored value in place.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::Map;
use super::error::UnsupportedOperationError;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the binary search tree.
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Box<Self>>,
    right: Option<Box<Self>>,
}

impl<K, V> Node<K, V> {
    /// Creates a new leaf node with no children.
    const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }
}

// =============================================================================
// OrderedTreeMap Definition
// =============================================================================

/// A mutable ordered map based on an unbalanced binary search tree.
///
/// Keys must implement `Ord`. The map keeps entries in sorted key order and
/// never rebalances, so operation cost is proportional to the tree height.
///
/// Removal is not supported by this backend; see
/// [`UnsupportedOperationError`].
///
/// # Time Complexity
///
/// | Operation      | Complexity              |
/// |----------------|-------------------------|
/// | `new`          | O(1)                    |
/// | `get`          | O(h), worst case O(N)   |
/// | `insert`       | O(h), worst case O(N)   |
/// | `contains_key` | O(h), worst case O(N)   |
/// | `min`/`max`    | O(h), worst case O(N)   |
/// | `len`          | O(1)                    |
/// | `is_empty`     | O(1)                    |
///
/// # Examples
///
/// ```rust
/// use duomap::map::OrderedTreeMap;
///
/// let mut map = OrderedTreeMap::new();
/// map.insert(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
/// ```
pub struct OrderedTreeMap<K, V> {
    /// Root node of the tree
    root: Option<Box<Node<K, V>>>,
    /// Number of entries
    length: usize,
}

impl<K, V> OrderedTreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let map: OrderedTreeMap<i32, String> = OrderedTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
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
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(1, "one");
    /// assert!(!map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes all entries from the map.
    ///
    /// Detaches the root; ownership cascades, so every node is reclaimed
    /// without an explicit traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(1, "one");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(&1), None);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
        self.length = 0;
    }

    /// Returns an iterator over the entries in sorted key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(2, "two");
    /// map.insert(1, "one");
    ///
    /// let keys: Vec<&i32> = map.iter().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&1, &2]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> OrderedTreeMapIterator<'_, K, V> {
        OrderedTreeMapIterator::new(self.root.as_deref(), self.length)
    }

    /// Returns an iterator over the keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    ///
    /// let keys: Vec<&i32> = map.keys().collect();
    /// assert_eq!(keys, vec![&1, &3]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values, in the sorted order of their keys.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns the entry with the smallest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some((&current.key, &current.value))
    }

    /// Returns the entry with the largest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(5, "five");
    /// assert_eq!(map.max(), Some((&5, &"five")));
    /// ```
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Some((&current.key, &current.value))
    }

    /// Collects every key into a [`HashSet`].
    ///
    /// Keys are unique by construction, so the set has exactly `len()`
    /// elements. The traversal order does not affect the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    ///
    /// let keys = map.key_set();
    /// assert_eq!(keys.len(), 2);
    /// assert!(keys.contains(&1));
    /// ```
    #[must_use]
    pub fn key_set(&self) -> HashSet<K>
    where
        K: Clone + Hash + Eq,
    {
        let mut keys = HashSet::with_capacity(self.length);
        Self::collect_keys(self.root.as_deref(), &mut keys);
        keys
    }

    /// Recursive helper for `key_set`.
    fn collect_keys(node: Option<&Node<K, V>>, keys: &mut HashSet<K>)
    where
        K: Clone + Hash + Eq,
    {
        if let Some(current) = node {
            Self::collect_keys(current.left.as_deref(), keys);
            keys.insert(current.key.clone());
            Self::collect_keys(current.right.as_deref(), keys);
        }
    }
}

impl<K: Ord, V> OrderedTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let map = OrderedTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Ord` on
    /// the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(h), worst case O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
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
        Q: Ord + ?Sized,
    {
        Self::find_in_node(self.root.as_deref(), key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(1, 10);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&1), Some(&11));
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::find_in_node_mut(self.root.as_deref_mut(), key).map(|node| &mut node.value)
    }

    /// Returns `true` if the map contains an entry for the key.
    ///
    /// # Complexity
    ///
    /// O(h), worst case O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// map.insert(1, "one");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::find_in_node(self.root.as_deref(), key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present, the stored value is replaced in place
    /// and the old value is returned; the tree shape and length do not
    /// change. Otherwise a new leaf is created and `None` is returned.
    ///
    /// # Complexity
    ///
    /// O(h), worst case O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duomap::map::OrderedTreeMap;
    ///
    /// let mut map = OrderedTreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&1), Some(&"ONE"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (new_root, replaced) = Self::insert_into_node(self.root.take(), key, value);
        self.root = Some(new_root);
        if replaced.is_none() {
            self.length += 1;
        }
        replaced
    }

    /// Recursive helper for `get` and `contains_key`.
    fn find_in_node<'a, Q>(node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let current = node?;
        match key.cmp(current.key.borrow()) {
            Ordering::Less => Self::find_in_node(current.left.as_deref(), key),
            Ordering::Greater => Self::find_in_node(current.right.as_deref(), key),
            Ordering::Equal => Some(current),
        }
    }

    /// Recursive helper for `get_mut`.
    fn find_in_node_mut<'a, Q>(
        node: Option<&'a mut Node<K, V>>,
        key: &Q,
    ) -> Option<&'a mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let current = node?;
        let ordering = key.cmp(current.key.borrow());
        match ordering {
            Ordering::Less => Self::find_in_node_mut(current.left.as_deref_mut(), key),
            Ordering::Greater => Self::find_in_node_mut(current.right.as_deref_mut(), key),
            Ordering::Equal => Some(current),
        }
    }

    /// Recursive helper for `insert`.
    ///
    /// Consumes the subtree and returns the (possibly new) subtree root so
    /// the caller can reattach it; parent links self-heal along the
    /// recursion. The second element is the replaced value, `None` if the
    /// key was fresh.
    fn insert_into_node(
        node: Option<Box<Node<K, V>>>,
        key: K,
        value: V,
    ) -> (Box<Node<K, V>>, Option<V>) {
        match node {
            None => (Box::new(Node::leaf(key, value)), None),
            Some(mut current) => match key.cmp(&current.key) {
                Ordering::Less => {
                    let (new_left, replaced) =
                        Self::insert_into_node(current.left.take(), key, value);
                    current.left = Some(new_left);
                    (current, replaced)
                }
                Ordering::Greater => {
                    let (new_right, replaced) =
                        Self::insert_into_node(current.right.take(), key, value);
                    current.right = Some(new_right);
                    (current, replaced)
                }
                Ordering::Equal => {
                    // Key exists, update value in place
                    let old_value = std::mem::replace(&mut current.value, value);
                    (current, Some(old_value))
                }
            },
        }
    }

    /// Recursive helper for owned iteration; moves entries out in key order.
    fn drain_into(node: Option<Box<Node<K, V>>>, entries: &mut Vec<(K, V)>) {
        if let Some(current) = node {
            let current = *current;
            Self::drain_into(current.left, entries);
            entries.push((current.key, current.value));
            Self::drain_into(current.right, entries);
        }
    }
}

// =============================================================================
// Map Contract Implementation
// =============================================================================

impl<K: Ord, V> Map<K, V> for OrderedTreeMap<K, V> {
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
        self.length
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

    /// Always fails: removal is outside this backend's contract.
    fn remove(&mut self, _key: &K) -> Result<Option<V>, UnsupportedOperationError> {
        Err(UnsupportedOperationError::new("OrderedTreeMap", "remove"))
    }

    /// Always fails: removal is outside this backend's contract.
    fn remove_matching(
        &mut self,
        _key: &K,
        _value: &V,
    ) -> Result<Option<V>, UnsupportedOperationError>
    where
        V: Clone + PartialEq,
    {
        Err(UnsupportedOperationError::new(
            "OrderedTreeMap",
            "remove_matching",
        ))
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing in-order iterator over an [`OrderedTreeMap`].
pub struct OrderedTreeMapIterator<'a, K, V> {
    /// Nodes whose entry and right subtree are still pending, deepest last
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> OrderedTreeMapIterator<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, remaining: usize) -> Self {
        let mut iterator = Self {
            stack: Vec::new(),
            remaining,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for OrderedTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for OrderedTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Owning in-order iterator over an [`OrderedTreeMap`].
pub struct OrderedTreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for OrderedTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for OrderedTreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterable: I) -> Self {
        let mut map = Self::new();
        map.extend(iterable);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> IntoIterator for OrderedTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = OrderedTreeMapIntoIterator<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.length);
        Self::drain_into(self.root.take(), &mut entries);
        OrderedTreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for OrderedTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .zip(other.iter())
                .all(|((left_key, left_value), (right_key, right_value))| {
                    left_key == right_key && left_value == right_value
                })
    }
}

impl<K: Ord, V: Eq> Eq for OrderedTreeMap<K, V> {}

impl<K: Hash, V: Hash> Hash for OrderedTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // In-order iteration makes the hash canonical for equal maps.
        self.length.hash(state);
        for entry in self.iter() {
            entry.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for OrderedTreeMap<K, V> {
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
impl<K, V> serde::Serialize for OrderedTreeMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
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
struct OrderedTreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> OrderedTreeMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for OrderedTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = OrderedTreeMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = OrderedTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for OrderedTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedTreeMapVisitor::new())
    }
}

// =============================================================================
// Compile-Time Assertions
// =============================================================================

static_assertions::assert_impl_all!(OrderedTreeMap<i32, String>: Send, Sync);
static_assertions::assert_impl_all!(OrderedTreeMap<String, Vec<u8>>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
