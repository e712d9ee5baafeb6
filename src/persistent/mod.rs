//! Persistent (immutable) hash map and its supporting types.
//!
//! - [`PersistentHashMap`]: Persistent hash map (HAMT)
//! - [`PersistentHashSet`]: Persistent hash set backed by the same trie
//! - [`Entry`]: The key/value pair yielded by iteration
//! - [`PersistentMap`]: The map contract; derived operations such as
//!   `map`, `flat_map`, `zip` and `unzip` are provided methods of this trait
//!
//! # Structural Sharing
//!
//! `put` and `remove` copy only the nodes on the path from the root to the
//! affected slot. Every other subtree is shared with the original map, which
//! stays valid and unchanged.
//!
//! # Examples
//!
//! ```rust
//! use lambars_hamt::persistent::{PersistentHashMap, PersistentMap};
//!
//! let map = PersistentHashMap::new()
//!     .put("one".to_string(), 1)
//!     .put("two".to_string(), 2);
//! assert_eq!(map.get("one"), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.put("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(updated.get("one"), Some(&100));
//!
//! // Derived operations yield ordered sequences
//! let mut lengths = map.map(|key, value| key.len() + *value as usize);
//! lengths.sort_unstable();
//! assert_eq!(lengths, vec![4, 5]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod contract;
mod entry;
mod hashmap;
mod hashset;
mod iterator;
mod node;

pub use contract::PersistentMap;
pub use contract::Zipped;
pub use contract::build;
pub use contract::write_map;
pub use entry::Entry;
pub use hashmap::PersistentHashMap;
pub use hashset::PersistentHashSet;
pub use hashset::PersistentHashSetIterator;
pub use iterator::PersistentHashMapIntoIterator;
pub use iterator::PersistentHashMapIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(*reference_counter, *reference_counter_clone);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
