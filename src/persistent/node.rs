//! Trie nodes of the hash array mapped trie and the path-copying algorithms
//! that operate on them.
//!
//! Every update copies the nodes on the path from the root to the modified
//! slot and shares every other child by reference. A node is never mutated
//! once it is reachable from a map.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::ReferenceCounter;
use super::entry::Entry;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const BRANCHING_FACTOR: usize = 32;

/// Bits of the hash consumed per trie level
const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting the slot index within a branch
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

/// Maximum depth of the trie (ceil(64 bits / 5 bits per level))
pub(super) const MAX_DEPTH: usize = 13;

// =============================================================================
// Hash computation
// =============================================================================

/// Computes the full-width hash of a key.
///
/// `DefaultHasher::new` uses fixed keys, so within one build the hash of a
/// key (and with it the shape and iteration order of a trie) is the same in
/// every process. The algorithm may change between Rust releases.
pub(super) fn compute_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Extracts the slot index at a given depth from a hash.
#[inline]
#[allow(clippy::cast_possible_truncation)] // masked to five bits
const fn hash_index(hash: u64, depth: usize) -> usize {
    debug_assert!(depth < MAX_DEPTH);
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK) as usize
}

/// Position of `bit` within the compressed children array.
#[inline]
const fn child_position(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node of the trie.
#[derive(Debug)]
pub(super) enum Node<K, V> {
    /// No entries at this position. Map roots use `None` instead, so only
    /// hand-built subtrees contain it.
    #[allow(dead_code)]
    Empty,
    /// A single entry.
    Leaf { hash: u64, key: K, value: V },
    /// Two or more entries whose keys share the same full hash.
    Collision {
        hash: u64,
        entries: Vec<Entry<K, V>>,
    },
    /// Bitmap-indexed branch; `children` holds only the occupied slots.
    Branch {
        bitmap: u32,
        children: Vec<ReferenceCounter<Node<K, V>>>,
    },
}

/// Outcome of removing a key from a subtree.
pub(super) enum Removal<K, V> {
    /// The key was not present; the subtree is unchanged.
    Absent,
    /// The subtree held only the removed key and is now empty.
    Vacated,
    /// The subtree was rebuilt without the key.
    Replaced(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(super) fn leaf(hash: u64, key: K, value: V) -> ReferenceCounter<Self> {
        ReferenceCounter::new(Self::Leaf { hash, key, value })
    }

    #[inline]
    const fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    /// Looks up `key` below this node.
    pub(super) fn get<Q>(&self, key: &Q, hash: u64) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut node = self;
        let mut depth = 0;
        loop {
            match node {
                Self::Empty => return None,
                Self::Leaf {
                    hash: leaf_hash,
                    key: leaf_key,
                    value,
                } => return (*leaf_hash == hash && leaf_key.borrow() == key).then_some(value),
                Self::Collision {
                    hash: collision_hash,
                    entries,
                } => {
                    if *collision_hash != hash {
                        return None;
                    }
                    return entries
                        .iter()
                        .find(|entry| entry.key.borrow() == key)
                        .map(|entry| &entry.value);
                }
                Self::Branch { bitmap, children } => {
                    let bit = 1u32 << hash_index(hash, depth);
                    if bitmap & bit == 0 {
                        return None;
                    }
                    node = &*children[child_position(*bitmap, bit)];
                    depth += 1;
                }
            }
        }
    }

    /// Builds the smallest subtree holding two nodes with different full
    /// hashes, descending while their hash chunks coincide.
    fn split(
        existing: ReferenceCounter<Self>,
        existing_hash: u64,
        incoming: ReferenceCounter<Self>,
        incoming_hash: u64,
        depth: usize,
    ) -> Self {
        debug_assert_ne!(existing_hash, incoming_hash);
        let existing_index = hash_index(existing_hash, depth);
        let incoming_index = hash_index(incoming_hash, depth);

        if existing_index == incoming_index {
            let subtree = Self::split(existing, existing_hash, incoming, incoming_hash, depth + 1);
            Self::Branch {
                bitmap: 1u32 << existing_index,
                children: vec![ReferenceCounter::new(subtree)],
            }
        } else {
            let bitmap = (1u32 << existing_index) | (1u32 << incoming_index);
            let children = if existing_index < incoming_index {
                vec![existing, incoming]
            } else {
                vec![incoming, existing]
            };
            Self::Branch { bitmap, children }
        }
    }
}

impl<K: Eq + Clone, V: Clone> Node<K, V> {
    /// Inserts `key` below `node`, returning the rebuilt node and whether the
    /// key was newly added.
    pub(super) fn insert(
        node: &ReferenceCounter<Self>,
        key: K,
        value: V,
        hash: u64,
        depth: usize,
    ) -> (ReferenceCounter<Self>, bool) {
        match node.as_ref() {
            Self::Empty => (Self::leaf(hash, key, value), true),
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value: leaf_value,
            } => {
                if *leaf_hash != hash {
                    let split = Self::split(
                        ReferenceCounter::clone(node),
                        *leaf_hash,
                        Self::leaf(hash, key, value),
                        hash,
                        depth,
                    );
                    (ReferenceCounter::new(split), true)
                } else if *leaf_key == key {
                    (Self::leaf(hash, key, value), false)
                } else {
                    tracing::trace!(hash, depth, "hash collision, creating bucket");
                    let entries = vec![
                        Entry::of(leaf_key.clone(), leaf_value.clone()),
                        Entry::of(key, value),
                    ];
                    (ReferenceCounter::new(Self::Collision { hash, entries }), true)
                }
            }
            Self::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash != hash {
                    let split = Self::split(
                        ReferenceCounter::clone(node),
                        *collision_hash,
                        Self::leaf(hash, key, value),
                        hash,
                        depth,
                    );
                    return (ReferenceCounter::new(split), true);
                }

                let mut new_entries = entries.clone();
                let added = match new_entries.iter().position(|entry| entry.key == key) {
                    Some(position) => {
                        new_entries[position] = Entry::of(key, value);
                        false
                    }
                    None => {
                        new_entries.push(Entry::of(key, value));
                        true
                    }
                };
                let collision = Self::Collision {
                    hash,
                    entries: new_entries,
                };
                (ReferenceCounter::new(collision), added)
            }
            Self::Branch { bitmap, children } => {
                let bit = 1u32 << hash_index(hash, depth);
                let position = child_position(*bitmap, bit);
                let mut new_children = children.clone();

                if bitmap & bit == 0 {
                    new_children.insert(position, Self::leaf(hash, key, value));
                    let branch = Self::Branch {
                        bitmap: bitmap | bit,
                        children: new_children,
                    };
                    (ReferenceCounter::new(branch), true)
                } else {
                    let (child, added) =
                        Self::insert(&children[position], key, value, hash, depth + 1);
                    new_children[position] = child;
                    let branch = Self::Branch {
                        bitmap: *bitmap,
                        children: new_children,
                    };
                    (ReferenceCounter::new(branch), added)
                }
            }
        }
    }

    /// Removes `key` from the subtree rooted at this node.
    pub(super) fn remove<Q>(&self, key: &Q, hash: u64, depth: usize) -> Removal<K, V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Empty => Removal::Absent,
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                ..
            } => {
                if *leaf_hash == hash && leaf_key.borrow() == key {
                    Removal::Vacated
                } else {
                    Removal::Absent
                }
            }
            Self::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash != hash {
                    return Removal::Absent;
                }
                let Some(position) = entries.iter().position(|entry| entry.key.borrow() == key)
                else {
                    return Removal::Absent;
                };

                match entries.len() {
                    1 => Removal::Vacated,
                    2 => {
                        let remaining = &entries[1 - position];
                        Removal::Replaced(Self::leaf(
                            hash,
                            remaining.key.clone(),
                            remaining.value.clone(),
                        ))
                    }
                    _ => {
                        let mut new_entries = entries.clone();
                        new_entries.remove(position);
                        Removal::Replaced(ReferenceCounter::new(Self::Collision {
                            hash,
                            entries: new_entries,
                        }))
                    }
                }
            }
            Self::Branch { bitmap, children } => {
                let bit = 1u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return Removal::Absent;
                }
                let position = child_position(*bitmap, bit);

                match children[position].remove(key, hash, depth + 1) {
                    Removal::Absent => Removal::Absent,
                    Removal::Vacated => {
                        let remaining_bitmap = bitmap & !bit;
                        if remaining_bitmap == 0 {
                            return Removal::Vacated;
                        }
                        let mut new_children = children.clone();
                        new_children.remove(position);
                        Self::compress(remaining_bitmap, new_children)
                    }
                    Removal::Replaced(child) => {
                        let mut new_children = children.clone();
                        new_children[position] = child;
                        Self::compress(*bitmap, new_children)
                    }
                }
            }
        }
    }

    /// Rebuilds a branch, hoisting a lone leaf or collision child into the
    /// parent slot. Branch children stay put: their slots depend on depth.
    fn compress(bitmap: u32, children: Vec<ReferenceCounter<Self>>) -> Removal<K, V> {
        if let [only] = children.as_slice()
            && !only.is_branch()
        {
            tracing::trace!(bitmap, "path compression, hoisting single child");
            return Removal::Replaced(ReferenceCounter::clone(only));
        }
        Removal::Replaced(ReferenceCounter::new(Self::Branch { bitmap, children }))
    }
}

// =============================================================================
// Tests
// =============================================================================
