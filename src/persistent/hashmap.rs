//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`PersistentHashMap`], an immutable hash map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentHashMap` is based on Hash Array Mapped Trie (HAMT), a data structure
//! that provides efficient immutable operations. It uses a 32-way branching trie
//! where hash bits are used to navigate the tree.
//!
//! - O(log32 N) get (effectively O(1) for practical sizes)
//! - O(log32 N) put
//! - O(log32 N) remove
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use lambars_hamt::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .put("one".to_string(), 1)
//!     .put("two".to_string(), 2)
//!     .put("three".to_string(), 3);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.get("two"), Some(&2));
//! assert_eq!(map.get("three"), Some(&3));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.put("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```
//!
//! # Canonical Empty Map
//!
//! The empty map owns no trie nodes. [`PersistentHashMap::EMPTY`] is the one
//! canonical empty value: `new`, `default`, removing the last key and
//! deserializing an empty payload all produce a map that is
//! [`ptr_eq`](PersistentHashMap::ptr_eq) to it.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::ReferenceCounter;
use super::contract::{self, PersistentMap};
use super::entry::Entry;
use super::iterator::{PersistentHashMapIntoIterator, PersistentHashMapIterator};
use super::node::{Node, Removal, compute_hash};

// =============================================================================
// PersistentHashMap Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// `PersistentHashMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// # Time Complexity
///
/// | Operation        | Complexity        |
/// |------------------|-------------------|
/// | `new`            | O(1)              |
/// | `get`            | O(log32 N)        |
/// | `put`            | O(log32 N)        |
/// | `remove`         | O(log32 N)        |
/// | `contains_key`   | O(log32 N)        |
/// | `contains_value` | O(N)              |
/// | `len`            | O(1)              |
/// | `is_empty`       | O(1)              |
///
/// # Examples
///
/// ```rust
/// use lambars_hamt::persistent::PersistentHashMap;
///
/// let map = PersistentHashMap::singleton("key".to_string(), 42);
/// assert_eq!(map.get("key"), Some(&42));
/// ```
pub struct PersistentHashMap<K, V> {
    /// Root node of the trie; `None` only for the canonical empty map
    root: Option<ReferenceCounter<Node<K, V>>>,
    /// Number of entries
    length: usize,
}

impl<K, V> PersistentHashMap<K, V> {
    /// The canonical empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    /// assert!(map.ptr_eq(&PersistentHashMap::EMPTY));
    /// ```
    pub const EMPTY: Self = Self {
        root: None,
        length: 0,
    };

    /// Returns the canonical empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` if both maps share the same root, i.e. they are the
    /// same instance rather than merely equal.
    ///
    /// All empty maps are the canonical empty map and are therefore `ptr_eq`
    /// to each other.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton(1, 2);
    /// let copy = map.clone();
    /// let rebuilt = PersistentHashMap::singleton(1, 2);
    ///
    /// assert!(map.ptr_eq(&copy));
    /// assert!(!map.ptr_eq(&rebuilt));
    /// assert_eq!(map, rebuilt);
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns `true` if this is the canonical empty map.
    #[inline]
    #[must_use]
    pub const fn is_canonical_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns an iterator over key-value pairs.
    ///
    /// The iterator is lazy, and iterating the same map again yields the
    /// same order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .put("a".to_string(), 1)
    ///     .put("b".to_string(), 2);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{}: {}", key, value);
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentHashMapIterator<'_, K, V> {
        PersistentHashMapIterator::new(self.root.as_deref(), self.length)
    }

    /// Returns an iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .put("a".to_string(), 1)
    ///     .put("b".to_string(), 2);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 3);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Hash + Eq, V> PersistentHashMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .put("hello".to_string(), 42);
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
        self.root.as_deref()?.get(key, compute_hash(key))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> PersistentHashMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton("key".to_string(), 42);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("key"), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::EMPTY.put(key, value)
    }

    /// Returns a map with `key` bound to `value`.
    ///
    /// If the map already contains the key, the value is replaced and the
    /// size is unchanged.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new().put("key".to_string(), 1);
    /// let map2 = map1.put("key".to_string(), 2);
    ///
    /// assert_eq!(map1.get("key"), Some(&1)); // Original unchanged
    /// assert_eq!(map2.get("key"), Some(&2)); // New version
    /// assert_eq!(map2.len(), 1);
    /// ```
    #[must_use]
    pub fn put(&self, key: K, value: V) -> Self {
        let hash = compute_hash(&key);
        let (root, added) = match &self.root {
            Some(root) => Node::insert(root, key, value, hash, 0),
            None => (Node::leaf(hash, key, value), true),
        };

        Self {
            root: Some(root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Returns a map without `key`.
    ///
    /// Removing the last key yields the canonical empty map. Removing a key
    /// that is not present returns the same instance.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .put("a".to_string(), 1)
    ///     .put("b".to_string(), 2);
    /// let removed = map.remove("a");
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get("a"), None);
    /// assert!(removed.remove("b").ptr_eq(&PersistentHashMap::EMPTY));
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(root) = &self.root else {
            return Self::EMPTY;
        };

        match root.remove(key, compute_hash(key), 0) {
            Removal::Absent => self.clone(),
            Removal::Vacated => Self::EMPTY,
            Removal::Replaced(root) => Self {
                root: Some(root),
                length: self.length - 1,
            },
        }
    }

    /// Merges two maps.
    ///
    /// `other` is the later write: on a key present in both maps, the value
    /// from `other` wins.
    ///
    /// # Complexity
    ///
    /// O(m log32 (n + m)) where m is the size of `other`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new()
    ///     .put("a".to_string(), 1)
    ///     .put("b".to_string(), 2);
    /// let map2 = PersistentHashMap::new()
    ///     .put("b".to_string(), 20)
    ///     .put("c".to_string(), 3);
    ///
    /// let merged = map1.merge(&map2);
    ///
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&20)); // From map2
    /// assert_eq!(merged.get("c"), Some(&3));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        other.iter().fold(self.clone(), |merged, (key, value)| {
            merged.put(key.clone(), value.clone())
        })
    }
}

// =============================================================================
// Map Contract
// =============================================================================

impl<K: Clone + Hash + Eq, V: Clone> PersistentMap for PersistentHashMap<K, V> {
    type Key = K;
    type Value = V;
    type Iter<'a>
        = PersistentHashMapIterator<'a, K, V>
    where
        Self: 'a;

    const KIND: &'static str = "HashMap";

    #[inline]
    fn empty() -> Self {
        Self::EMPTY
    }

    #[inline]
    fn size(&self) -> usize {
        self.length
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn put(&self, key: K, value: V) -> Self {
        self.put(key, value)
    }

    #[inline]
    fn remove(&self, key: &K) -> Self {
        self.remove(key)
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.iter()
    }

    fn merge(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for PersistentHashMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
        }
    }
}

impl<K, V> Default for PersistentHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        contract::build(iter)
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<Entry<K, V>> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = Entry<K, V>>>(iter: I) -> Self {
        contract::build(iter)
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentHashMapIntoIterator::new(self.root, self.length)
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for PersistentHashMap<K, V> {
    /// Compares the entry sets: same size, and every entry of `self` is found
    /// in `other` by hashed lookup. Iteration order never matters.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.length != other.length {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|other_value| other_value == value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for PersistentHashMap<K, V> {}

impl<K: Hash, V: Hash> Hash for PersistentHashMap<K, V> {
    /// Order-independent: entry hashes are combined with a wrapping sum.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.iter().fold(0_u64, |accumulator, entry| {
            accumulator.wrapping_add(compute_hash(&entry))
        });
        state.write_usize(self.length);
        state.write_u64(combined);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> fmt::Display for PersistentHashMap<K, V>
where
    K: Clone + Hash + Eq + fmt::Display,
    V: Clone + fmt::Display,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        contract::write_map(self, formatter)
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentHashMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentHashMap<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentHashMap<K, V>
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
struct PersistentHashMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentHashMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentHashMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = PersistentHashMap::EMPTY;
        while let Some((key, value)) = access.next_entry()? {
            map = map.put(key, value);
        }
        if map.is_canonical_empty() {
            tracing::trace!("empty payload resolved to the canonical empty map");
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentHashMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentHashMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
