//! `MessagePack` byte codec for [`PersistentHashMap`].
//!
//! Maps are written as `MessagePack` maps through their serde implementations.
//! Decoding an empty payload yields [`PersistentHashMap::EMPTY`], so the
//! canonical empty map survives a round trip; a non-empty payload decodes to
//! an equal but distinct map.
//!
//! # Examples
//!
//! ```rust
//! use lambars_hamt::codec;
//! use lambars_hamt::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new().put(1, "one".to_string());
//! let bytes = codec::to_bytes(&map).unwrap();
//! let decoded: PersistentHashMap<i32, String> = codec::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded, map);
//!
//! let empty: PersistentHashMap<i32, String> = PersistentHashMap::new();
//! let decoded: PersistentHashMap<i32, String> =
//!     codec::from_bytes(&codec::to_bytes(&empty).unwrap()).unwrap();
//! assert!(decoded.ptr_eq(&PersistentHashMap::EMPTY));
//! ```

use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;
use crate::persistent::PersistentHashMap;

/// Encodes `map` as `MessagePack` bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if a key or value fails to serialize.
pub fn to_bytes<K, V>(map: &PersistentHashMap<K, V>) -> Result<Vec<u8>, CodecError>
where
    K: Serialize,
    V: Serialize,
{
    let bytes = rmp_serde::to_vec(map)?;
    tracing::trace!(entries = map.len(), bytes = bytes.len(), "encoded map");
    Ok(bytes)
}

/// Decodes a map from `MessagePack` bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `bytes` is not a `MessagePack` map of the
/// expected key and value types.
pub fn from_bytes<K, V>(bytes: &[u8]) -> Result<PersistentHashMap<K, V>, CodecError>
where
    K: DeserializeOwned + Clone + Hash + Eq,
    V: DeserializeOwned + Clone,
{
    Ok(rmp_serde::from_slice(bytes)?)
}
