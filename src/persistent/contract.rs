//! The map contract shared by every persistent map kind.
//!
//! [`PersistentMap`] has a small set of required methods (the core
//! operations `get`, `put`, `remove`, `size` and `iter`, plus the canonical
//! `empty` value). Every other operation is a provided method written only in
//! terms of those, so a new map kind gets the whole traversal vocabulary by
//! implementing the core.
//!
//! Operations that project entries (`map`, `zip`, `unzip`, ...) return
//! ordered `Vec` sequences in the map's iteration order rather than maps,
//! because projected results need not have unique keys.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::entry::Entry;
use super::hashset::PersistentHashSet;
use crate::error::MapError;

/// Entries paired with the elements of another sequence, in iteration order.
pub type Zipped<K, V, T> = Vec<(Entry<K, V>, T)>;

// =============================================================================
// PersistentMap Definition
// =============================================================================

/// The contract of an immutable associative map.
///
/// # Laws
///
/// For every key `k` and value `v`:
///
/// - `map.put(k, v).get(&k) == Some(&v)`
/// - `map.put(k, v).remove(&k).get(&k) == None`
/// - `map.put(k, v).put(k, v) == map.put(k, v)`
/// - equality depends only on the `(key, value)` pairs, never on the order
///   of the operations that produced them
///
/// # Examples
///
/// ```rust
/// use lambars_hamt::persistent::{Entry, PersistentHashMap, PersistentMap};
///
/// let map = PersistentHashMap::new().put(1, 1).put(2, 2).put(3, 3);
/// let zipped = map.zip_all(["a", "b"], Entry::of(9, 10), "z");
///
/// assert_eq!(zipped.len(), 3);
/// assert_eq!(zipped.iter().filter(|(_, label)| *label == "z").count(), 1);
/// ```
pub trait PersistentMap: Sized + Clone {
    /// The key type.
    type Key: Clone + Eq;

    /// The value type.
    type Value: Clone;

    /// Borrowing iterator over the entries of the map.
    type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    /// Name of the map kind, used when rendering.
    const KIND: &'static str;

    /// Returns the canonical empty map of this kind.
    fn empty() -> Self;

    /// Returns the number of entries.
    fn size(&self) -> usize;

    /// Returns the value bound to `key`, if any.
    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Returns a map with `key` bound to `value`.
    #[must_use]
    fn put(&self, key: Self::Key, value: Self::Value) -> Self;

    /// Returns a map without `key`.
    #[must_use]
    fn remove(&self, key: &Self::Key) -> Self;

    /// Returns a lazy iterator over the entries.
    ///
    /// Iterating the same map again reproduces the same order.
    fn iter(&self) -> Self::Iter<'_>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns `true` if the map has no entries.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the value bound to `key`, failing when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the map does not contain `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::prelude::*;
    ///
    /// let map = PersistentHashMap::new().put(1, 2);
    /// assert_eq!(map.apply(&1), Ok(&2));
    /// assert_eq!(map.apply(&3), Err(MapError::KeyNotFound { kind: "HashMap" }));
    /// ```
    fn apply(&self, key: &Self::Key) -> Result<&Self::Value, MapError> {
        let kind = Self::KIND;
        self.get(key).ok_or(MapError::KeyNotFound { kind })
    }

    /// Returns `true` if `key` is bound. Costs one trie descent.
    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if any entry holds `value`.
    ///
    /// Values are not indexed, so this is a full O(N) scan, unlike
    /// [`contains_key`](Self::contains_key).
    fn contains_value(&self, value: &Self::Value) -> bool
    where
        Self::Value: PartialEq,
    {
        self.iter().any(|(_, candidate)| candidate == value)
    }

    /// Returns the first entry in iteration order.
    fn head_option(&self) -> Option<Entry<Self::Key, Self::Value>> {
        self.iter().next().map(to_entry)
    }

    /// Returns the map without its first entry, or `None` if it is empty.
    fn tail_option(&self) -> Option<Self> {
        self.iter().next().map(|(key, _)| self.remove(key))
    }

    /// Returns every entry in iteration order.
    fn entries(&self) -> Vec<Entry<Self::Key, Self::Value>> {
        self.iter().map(to_entry).collect()
    }

    /// Returns the entries as an unordered set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::{Entry, PersistentHashMap, PersistentHashSet, PersistentMap};
    ///
    /// let map = PersistentHashMap::new().put(2, "2").put(1, "1");
    /// let expected: PersistentHashSet<_> =
    ///     [Entry::of(1, "1"), Entry::of(2, "2")].into_iter().collect();
    /// assert_eq!(map.entry_set(), expected);
    /// ```
    fn entry_set(&self) -> PersistentHashSet<Entry<Self::Key, Self::Value>>
    where
        Self::Key: Hash,
        Self::Value: Hash + Eq,
    {
        self.iter().map(to_entry).collect()
    }

    /// Left fold over the entries in iteration order.
    ///
    /// The order is deterministic for a given map but unspecified, so
    /// `function` should not depend on it.
    fn fold<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &Self::Key, &Self::Value) -> B,
    {
        self.iter()
            .fold(init, |accumulator, (key, value)| function(accumulator, key, value))
    }

    /// Runs `action` on the first entry, if any, and returns the map.
    #[must_use]
    fn peek<F>(&self, action: F) -> Self
    where
        F: FnOnce(&Self::Key, &Self::Value),
    {
        if let Some((key, value)) = self.iter().next() {
            action(key, value);
        }
        self.clone()
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Applies `function` to every entry, collecting the results in iteration
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::{PersistentHashMap, PersistentMap};
    ///
    /// let map = PersistentHashMap::new().put(1, "1").put(2, "2");
    /// let mut keys = map.map(|key, _| *key);
    /// keys.sort_unstable();
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    fn map<T, F>(&self, mut function: F) -> Vec<T>
    where
        F: FnMut(&Self::Key, &Self::Value) -> T,
    {
        self.iter().map(|(key, value)| function(key, value)).collect()
    }

    /// Maps every entry to zero or more entries and folds them into a new map.
    ///
    /// Entries are put in the order of the flattened stream, so the last
    /// entry for a repeated key wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::{Entry, PersistentHashMap, PersistentMap};
    ///
    /// let map = PersistentHashMap::new().put(1, 11).put(2, 22);
    /// let flattened: PersistentHashMap<i32, i32> =
    ///     map.flat_map(|key, value| [Entry::of(*key, *value), Entry::of(key * 10, value * 10)]);
    ///
    /// assert_eq!(flattened.len(), 4);
    /// assert_eq!(flattened.get(&20), Some(&220));
    /// ```
    fn flat_map<M, I, F>(&self, mut function: F) -> M
    where
        M: PersistentMap,
        F: FnMut(&Self::Key, &Self::Value) -> I,
        I: IntoIterator,
        I::Item: Into<Entry<M::Key, M::Value>>,
    {
        build(self.iter().flat_map(|(key, value)| function(key, value)))
    }

    /// Keeps only the entries matching `predicate`.
    #[must_use]
    fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Self::Key, &Self::Value) -> bool,
    {
        let rejected: Vec<Self::Key> = self
            .iter()
            .filter(|&(key, value)| !predicate(key, value))
            .map(|(key, _)| key.clone())
            .collect();
        rejected.iter().fold(self.clone(), |map, key| map.remove(key))
    }

    /// Returns an equal map.
    ///
    /// Entries are already unique by key; values are never deduplicated.
    #[must_use]
    fn distinct(&self) -> Self {
        self.clone()
    }

    /// Removes every key yielded by `keys`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::{PersistentHashMap, PersistentMap};
    ///
    /// let map = PersistentHashMap::new().put(1, 'a').put(2, 'b').put(3, 'c');
    /// assert_eq!(map.remove_all([1, 3]), PersistentHashMap::new().put(2, 'b'));
    /// ```
    #[must_use]
    fn remove_all<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Self::Key>,
    {
        let mut map = self.clone();
        for key in keys {
            map = map.remove(key.borrow());
        }
        map
    }

    /// [`remove_all`](Self::remove_all) for an operand that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NullArgument`] if `keys` is `None`.
    fn try_remove_all<I>(&self, keys: Option<I>) -> Result<Self, MapError>
    where
        I: IntoIterator,
        I::Item: Borrow<Self::Key>,
    {
        let Some(keys) = keys else {
            return Err(MapError::NullArgument {
                operation: "remove_all",
                argument: "keys",
            });
        };
        Ok(self.remove_all(keys))
    }

    /// Merges `other` into this map; on a shared key the value from `other`
    /// (the later write) wins.
    #[must_use]
    fn merge(&self, other: &Self) -> Self {
        other.iter().fold(self.clone(), |merged, (key, value)| {
            merged.put(key.clone(), value.clone())
        })
    }

    /// Builds a map of this kind by putting every entry in order.
    fn of_all<I>(entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry<Self::Key, Self::Value>>,
    {
        build(entries)
    }

    // =========================================================================
    // Zipping
    // =========================================================================

    /// Splits every entry with `function` into two parallel sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_hamt::persistent::{PersistentHashMap, PersistentMap};
    ///
    /// let map = PersistentHashMap::new().put(0, 0).put(1, 1);
    /// let (keys, successors) = map.unzip(|key, value| (*key, value + 1));
    ///
    /// assert_eq!(keys.len(), 2);
    /// for (key, successor) in keys.iter().zip(&successors) {
    ///     assert_eq!(key + 1, *successor);
    /// }
    /// ```
    fn unzip<L, R, F>(&self, mut function: F) -> (Vec<L>, Vec<R>)
    where
        F: FnMut(&Self::Key, &Self::Value) -> (L, R),
    {
        self.iter().map(|(key, value)| function(key, value)).unzip()
    }

    /// Pairs entries with the elements of `that`, stopping at the shorter
    /// side.
    fn zip<T, I>(&self, that: I) -> Zipped<Self::Key, Self::Value, T>
    where
        I: IntoIterator<Item = T>,
    {
        self.iter().map(to_entry).zip(that).collect()
    }

    /// [`zip`](Self::zip) for an operand that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NullArgument`] if `that` is `None`.
    fn try_zip<T, I>(&self, that: Option<I>) -> Result<Zipped<Self::Key, Self::Value, T>, MapError>
    where
        I: IntoIterator<Item = T>,
    {
        let Some(that) = that else {
            return Err(MapError::NullArgument {
                operation: "zip",
                argument: "that",
            });
        };
        Ok(self.zip(that))
    }

    /// Pairs entries with the elements of `that`, padding the shorter side
    /// with `this_default` or `that_default` up to the longer length.
    fn zip_all<T, I>(
        &self,
        that: I,
        this_default: Entry<Self::Key, Self::Value>,
        that_default: T,
    ) -> Zipped<Self::Key, Self::Value, T>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        let mut these = self.iter().map(to_entry).fuse();
        let mut those = that.into_iter().fuse();
        std::iter::from_fn(move || match (these.next(), those.next()) {
            (None, None) => None,
            (this, other) => Some((
                this.unwrap_or_else(|| this_default.clone()),
                other.unwrap_or_else(|| that_default.clone()),
            )),
        })
        .collect()
    }

    /// [`zip_all`](Self::zip_all) for an operand that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NullArgument`] if `that` is `None`.
    fn try_zip_all<T, I>(
        &self,
        that: Option<I>,
        this_default: Entry<Self::Key, Self::Value>,
        that_default: T,
    ) -> Result<Zipped<Self::Key, Self::Value, T>, MapError>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        let Some(that) = that else {
            return Err(MapError::NullArgument {
                operation: "zip_all",
                argument: "that",
            });
        };
        Ok(self.zip_all(that, this_default, that_default))
    }

    /// Pairs every entry with its zero-based position in iteration order.
    fn zip_with_index(&self) -> Zipped<Self::Key, Self::Value, usize> {
        self.iter().map(to_entry).zip(0..).collect()
    }
}

// =============================================================================
// Construction and Rendering
// =============================================================================

/// Builds a map of kind `M` by putting every entry in order, starting from
/// `M::empty()`; a later entry for the same key replaces an earlier one.
///
/// # Examples
///
/// ```rust
/// use lambars_hamt::persistent::{build, Entry, PersistentHashMap};
///
/// let map: PersistentHashMap<&str, i32> = build([("a", 1), ("b", 2), ("a", 3)]);
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("a"), Some(&3));
///
/// let from_entries: PersistentHashMap<&str, i32> = build([Entry::of("a", 1)]);
/// assert_eq!(from_entries.len(), 1);
/// ```
pub fn build<M, I>(entries: I) -> M
where
    M: PersistentMap,
    I: IntoIterator,
    I::Item: Into<Entry<M::Key, M::Value>>,
{
    entries.into_iter().fold(M::empty(), |map, entry| {
        let Entry { key, value } = entry.into();
        map.put(key, value)
    })
}

/// Writes `map` as `Kind((k1, v1), (k2, v2), ...)` in iteration order.
///
/// # Errors
///
/// Propagates errors from `formatter`.
pub fn write_map<M>(map: &M, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
where
    M: PersistentMap,
    M::Key: fmt::Display,
    M::Value: fmt::Display,
{
    write!(formatter, "{}(", M::KIND)?;
    for (index, (key, value)) in map.iter().enumerate() {
        if index > 0 {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{}", Entry::of(key, value))?;
    }
    write!(formatter, ")")
}

fn to_entry<K: Clone, V: Clone>((key, value): (&K, &V)) -> Entry<K, V> {
    Entry::of(key.clone(), value.clone())
}

// =============================================================================
// Tests
// =============================================================================
