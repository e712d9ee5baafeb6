//! The key/value pair that is the unit of iteration.

use std::fmt;

/// An immutable key/value pair.
///
/// Two entries are equal when both their keys and their values are equal,
/// and the hash covers both fields as well.
///
/// # Examples
///
/// ```rust
/// use lambars_hamt::persistent::Entry;
///
/// let entry = Entry::of(1, "one");
/// assert_eq!(entry.key, 1);
/// assert_eq!(format!("{entry}"), "(1, one)");
/// assert_eq!(Entry::from((1, "one")), entry);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<K, V> {
    /// The key.
    pub key: K,
    /// The value bound to the key.
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from a key and a value.
    #[inline]
    #[must_use]
    pub const fn of(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Consumes the entry, returning a `(key, value)` tuple.
    #[inline]
    #[must_use]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Borrows both fields as a tuple.
    #[inline]
    #[must_use]
    pub const fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    #[inline]
    fn from(entry: Entry<K, V>) -> Self {
        entry.into_pair()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.key, self.value)
    }
}
