//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each real node having a single position on the ring, each
//! node gets `round(weight * replication_factor)` positions. This provides:
//!
//! 1. **Better Load Distribution**: more positions = smoother distribution of keys
//! 2. **Weighting**: a node with twice the weight owns roughly twice the key space
//! 3. **Gradual Rebalancing**: when nodes join/leave, only a fraction of keys move
//!
//! # Placement
//!
//! A virtual node's position is the hash of its serialized identity:
//!
//! ```text
//! u64 BE identity length | identity bytes | u32 BE replica index
//! ```
//!
//! The length prefix makes the encoding unambiguous whatever characters the
//! node identity contains, and the ring stores the `(node, index)` pair
//! itself, so resolving a position back to its real node never parses text.

use crate::partitioner::Partitioner;
use crate::token::Token;
use std::fmt;
use std::sync::Arc;

/// A virtual node on the hash ring.
///
/// Cheap to clone: the identity is shared with every other replica of the
/// same real node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Identity of the real node that owns this replica.
    node: Arc<str>,
    /// Replica index, `0..virtual_count`.
    index: u32,
}

impl VirtualNode {
    #[inline]
    pub fn new(node: Arc<str>, index: u32) -> Self {
        Self { node, index }
    }

    /// Identity of the owning real node.
    #[inline]
    pub fn node(&self) -> &Arc<str> {
        &self.node
    }

    /// Replica index of this virtual node.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Serialized form fed to the partitioner.
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.node, self.index)
    }

    /// Position of this virtual node on the ring.
    pub fn position<P: Partitioner + ?Sized>(&self, partitioner: &P) -> Token {
        position(partitioner, &self.node, self.index)
    }

    /// True if this replica belongs to the real node `node`.
    #[inline]
    pub fn is_owned_by(&self, node: &str) -> bool {
        &*self.node == node
    }
}

/// Serialize replica `index` of `node` (see the module docs for the layout).
pub fn encode(node: &str, index: u32) -> Vec<u8> {
    let name = node.as_bytes();
    let mut buf = Vec::with_capacity(8 + name.len() + 4);
    buf.extend_from_slice(&(name.len() as u64).to_be_bytes());
    buf.extend_from_slice(name);
    buf.extend_from_slice(&index.to_be_bytes());
    buf
}

/// Ring position of replica `index` of `node`, without building a
/// [`VirtualNode`].
pub fn position<P: Partitioner + ?Sized>(partitioner: &P, node: &str, index: u32) -> Token {
    partitioner.token(&encode(node, index))
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(node={}, index={})", self.node, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::Blake3Partitioner;

    fn vnode(name: &str, index: u32) -> VirtualNode {
        VirtualNode::new(Arc::from(name), index)
    }

    #[test]
    fn test_encode_layout() {
        let encoded = vnode("ab", 7).encode();
        assert_eq!(
            encoded,
            vec![0, 0, 0, 0, 0, 0, 0, 2, b'a', b'b', 0, 0, 0, 7]
        );
    }

    #[test]
    fn test_encoding_is_unambiguous() {
        // "node#1" + 0 must not collide with "node" + something
        let a = vnode("node#1", 0).encode();
        let b = vnode("node", 1).encode();
        assert_ne!(a, b);
    }

    #[test]
    fn test_replicas_get_distinct_positions() {
        let p = Blake3Partitioner;
        let vnode0 = vnode("node1", 0);
        let vnode1 = vnode("node1", 1);

        assert_ne!(vnode0.position(&p), vnode1.position(&p));
        assert_eq!(vnode0.node(), vnode1.node());
    }

    #[test]
    fn test_position_is_stable() {
        let p = Blake3Partitioner;
        assert_eq!(vnode("node1", 3).position(&p), vnode("node1", 3).position(&p));
    }

    #[test]
    fn test_ownership() {
        let v = vnode("a#b", 0);
        assert!(v.is_owned_by("a#b"));
        assert!(!v.is_owned_by("a"));
        assert_eq!(v.to_string(), "VNode(node=a#b, index=0)");
    }
}
