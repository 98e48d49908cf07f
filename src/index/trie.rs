//! Immutable copy-on-write trie keyed by byte strings.
//!
//! Every mutating operation returns a new [`Trie`] that shares all
//! untouched subtrees with its input; published nodes are never modified.
//! This makes concurrent reads of a handle safe without any locking, and
//! old versions stay valid for as long as someone holds them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::index::value::{TrieValue, TrieValueType};

/// One node of the trie: an edge per key byte, plus an optional value.
///
/// A node is value-bearing when `value` is `Some`; that is independent of
/// whether it has children. Only the root may be both valueless and
/// childless; everywhere else such nodes are pruned by `remove`.
#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<u8, Arc<TrieNode>>,
    value: Option<Arc<TrieValue>>,
}

/// An immutable persistent map from byte strings to tagged values.
///
/// Cloning a handle is cheap (an `Arc` bump); `put` and `remove` return new
/// handles and leave the receiver untouched. Publishing a handle to another
/// thread is the caller's concern (an atomic cell, a mutex, a channel);
/// once published, any number of threads may `get` concurrently.
///
/// # Example
/// ```
/// use burrowdb::index::Trie;
///
/// let t1 = Trie::new().put(b"key", 233u32);
/// let t2 = t1.put(b"key", 234u32);
///
/// assert_eq!(t1.get::<u32>(b"key"), Some(&233));
/// assert_eq!(t2.get::<u32>(b"key"), Some(&234));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trie {
    root: Option<Arc<TrieNode>>,
}

impl Trie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Check whether the trie holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Look up a key, expecting a value of type `T`.
    ///
    /// Returns `None` when the key is absent, when the terminal node bears
    /// no value, or when the stored value has a different tag than `T`.
    /// Runs in O(|key|) with no allocation.
    pub fn get<T: TrieValueType>(&self, key: &[u8]) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        for byte in key {
            node = node.children.get(byte)?;
        }
        T::from_value(node.value.as_deref()?)
    }

    /// Return a new trie that maps `key` to `value`.
    ///
    /// Only the nodes along the key's path are cloned; every other subtree
    /// is shared with `self`. A previous value under the same key is
    /// shadowed, and the children of any pre-existing node at the terminal
    /// position are preserved.
    #[must_use]
    pub fn put<T: TrieValueType>(&self, key: &[u8], value: T) -> Trie {
        let value = Arc::new(value.into_value());
        Trie {
            root: Some(put_node(self.root.as_ref(), key, value)),
        }
    }

    /// Return a new trie without `key`.
    ///
    /// Ancestors left both valueless and childless are pruned on the way
    /// back up. Removing an absent key returns a trie sharing the original
    /// root.
    #[must_use]
    pub fn remove(&self, key: &[u8]) -> Trie {
        match &self.root {
            None => self.clone(),
            Some(root) => Trie {
                root: remove_node(root, key),
            },
        }
    }
}

/// Rebuild the path for `key`, sharing everything off-path with the old
/// nodes. `node` is the pre-existing node at this position, if any.
fn put_node(node: Option<&Arc<TrieNode>>, key: &[u8], value: Arc<TrieValue>) -> Arc<TrieNode> {
    let mut children = node.map(|n| n.children.clone()).unwrap_or_default();

    match key.split_first() {
        // Terminal byte: this node carries the value, keeping any children.
        None => Arc::new(TrieNode {
            children,
            value: Some(value),
        }),
        Some((byte, rest)) => {
            let child = children.get(byte).cloned();
            children.insert(*byte, put_node(child.as_ref(), rest, value));
            Arc::new(TrieNode {
                children,
                // Interior nodes along the path keep their own value.
                value: node.and_then(|n| n.value.clone()),
            })
        }
    }
}

/// Remove `key` below `node`. Returns `None` when the edge to this node
/// should be dropped; returns a handle sharing `node` itself when nothing
/// under it changed.
fn remove_node(node: &Arc<TrieNode>, key: &[u8]) -> Option<Arc<TrieNode>> {
    match key.split_first() {
        None => {
            if node.value.is_none() {
                // Key not present.
                return Some(Arc::clone(node));
            }
            if node.children.is_empty() {
                return None;
            }
            Some(Arc::new(TrieNode {
                children: node.children.clone(),
                value: None,
            }))
        }
        Some((byte, rest)) => {
            let child = match node.children.get(byte) {
                Some(child) => child,
                // Key not present; share the whole subtree.
                None => return Some(Arc::clone(node)),
            };

            let new_child = remove_node(child, rest);
            if let Some(ref new_child) = new_child {
                if Arc::ptr_eq(new_child, child) {
                    return Some(Arc::clone(node));
                }
            }

            let mut children = node.children.clone();
            match new_child {
                Some(new_child) => {
                    children.insert(*byte, new_child);
                }
                None => {
                    children.remove(byte);
                }
            }

            // Prune nodes that lost their last child and bear no value.
            if children.is_empty() && node.value.is_none() {
                return None;
            }
            Some(Arc::new(TrieNode {
                children,
                value: node.value.clone(),
            }))
        }
    }
}
