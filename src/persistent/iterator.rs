//! Lazy iteration over a trie snapshot.
//!
//! Both iterators walk the trie depth first, visiting branch children in
//! bitmap order and collision entries in bucket order. The walk depends only on
//! the shape of the trie, so iterating the same map twice yields the same
//! sequence.

use std::iter::FusedIterator;
use std::slice;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::entry::Entry;
use super::node::Node;

/// Inline capacity of the traversal stack before it spills to the heap.
const STACK_CAPACITY: usize = 32;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over key-value pairs of a
/// [`PersistentHashMap`](super::PersistentHashMap).
///
/// Entries are produced on demand; no buffer of the whole map is built.
pub struct PersistentHashMapIterator<'a, K, V> {
    stack: SmallVec<[&'a Node<K, V>; STACK_CAPACITY]>,
    bucket: slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> PersistentHashMapIterator<'a, K, V> {
    pub(super) fn new(root: Option<&'a Node<K, V>>, length: usize) -> Self {
        let mut stack = SmallVec::new();
        stack.extend(root);
        Self {
            stack,
            bucket: slice::Iter::default(),
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for PersistentHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.bucket.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }

            match self.stack.pop()? {
                Node::Empty => {}
                Node::Leaf { key, value, .. } => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((key, value));
                }
                Node::Collision { entries, .. } => self.bucket = entries.iter(),
                Node::Branch { children, .. } => {
                    self.stack.extend(children.iter().rev().map(|child| &**child));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentHashMapIterator<'_, K, V> {}

impl<K, V> Clone for PersistentHashMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            bucket: self.bucket.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over key-value pairs of a
/// [`PersistentHashMap`](super::PersistentHashMap).
///
/// Nodes may still be shared with other maps, so keys and values are cloned
/// as they are yielded.
pub struct PersistentHashMapIntoIterator<K, V> {
    stack: Vec<ReferenceCounter<Node<K, V>>>,
    bucket: Option<(ReferenceCounter<Node<K, V>>, usize)>,
    remaining: usize,
}

impl<K, V> PersistentHashMapIntoIterator<K, V> {
    pub(super) fn new(root: Option<ReferenceCounter<Node<K, V>>>, length: usize) -> Self {
        Self {
            stack: root.into_iter().collect(),
            bucket: None,
            remaining: length,
        }
    }
}

impl<K: Clone, V: Clone> Iterator for PersistentHashMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((node, index)) = self.bucket.as_mut() {
                if let Node::Collision { entries, .. } = &**node
                    && let Some(entry) = entries.get(*index)
                {
                    *index += 1;
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((entry.key.clone(), entry.value.clone()));
                }
                self.bucket = None;
            }

            let node = self.stack.pop()?;
            match node.as_ref() {
                Node::Empty => {}
                Node::Leaf { key, value, .. } => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((key.clone(), value.clone()));
                }
                Node::Collision { .. } => {
                    self.bucket = Some((ReferenceCounter::clone(&node), 0));
                }
                Node::Branch { children, .. } => {
                    self.stack.extend(children.iter().rev().cloned());
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for PersistentHashMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K: Clone, V: Clone> FusedIterator for PersistentHashMapIntoIterator<K, V> {}
