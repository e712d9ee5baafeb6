//! Error types raised by the map contract and the byte codec.

use thiserror::Error;

/// Errors raised by [`PersistentMap`](crate::persistent::PersistentMap)
/// operations.
///
/// Both variants are local failures returned straight to the caller; no
/// operation leaves a partially updated map behind.
///
/// # Examples
///
/// ```rust
/// use lambars_hamt::prelude::*;
///
/// let map = PersistentHashMap::singleton(1, 2);
/// assert_eq!(
///     map.apply(&3),
///     Err(MapError::KeyNotFound { kind: "HashMap" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// `apply` was called with a key the map does not contain.
    #[error("key not found in {kind}")]
    KeyNotFound {
        /// Kind name of the map that was queried.
        kind: &'static str,
    },
    /// A required operand was missing.
    #[error("{operation}: {argument} is missing")]
    NullArgument {
        /// The operation that required the operand.
        operation: &'static str,
        /// The name of the missing operand.
        argument: &'static str,
    },
}

/// Errors raised by [`codec::to_bytes`](crate::codec::to_bytes) and
/// [`codec::from_bytes`](crate::codec::from_bytes).
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum CodecError {
    /// The map could not be encoded.
    #[error("failed to encode map: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    /// The bytes did not decode to a map.
    #[error("failed to decode map: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}
