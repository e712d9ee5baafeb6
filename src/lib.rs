//! # lambars-hamt
//!
//! A persistent (immutable) hash map built on a hash array mapped trie,
//! together with the derived traversal operations of a functional map.
//!
//! ## Overview
//!
//! - **Core**: [`PersistentHashMap`](persistent::PersistentHashMap) with
//!   `get`, `put`, `remove` and `merge`, each returning a new map that shares
//!   every untouched subtree with its predecessor.
//! - **Contract layer**: the [`PersistentMap`](persistent::PersistentMap)
//!   trait, whose provided methods (`map`, `flat_map`, `zip`, `unzip`, ...)
//!   are written purely in terms of the core operations.
//! - **Canonical empty map**: every empty factory, and every removal that
//!   empties a map, yields [`PersistentHashMap::EMPTY`](persistent::PersistentHashMap::EMPTY).
//! - **Serialization**: serde support and a byte codec that resolve empty
//!   payloads back to the canonical empty map.
//!
//! ## Feature Flags
//!
//! - `arc`: share trie nodes through `Arc` instead of `Rc` (thread-safe)
//! - `serde`: serde implementations and the [`codec`] module
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lambars_hamt::prelude::*;
//!
//! let map = PersistentHashMap::new().put(1, "one").put(2, "two");
//! assert_eq!(map.apply(&1), Ok(&"one"));
//! assert!(map.apply(&3).is_err());
//!
//! let empty = map.remove(&1).remove(&2);
//! assert!(empty.ptr_eq(&PersistentHashMap::EMPTY));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the map, its entry and set types, the contract trait and the
/// error type.
///
/// # Usage
///
/// ```rust
/// use lambars_hamt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::MapError;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;

#[cfg(feature = "serde")]
pub mod codec;
