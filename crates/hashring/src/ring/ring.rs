//! Hash ring data structure.
//!
//! # Layout
//!
//! The ring keeps two coupled indexes plus a weight table:
//!
//! - `vnodes`: position -> virtual node occupying it
//! - `sorted`: every occupied position, ascending, no duplicates
//! - `weights`: real node -> weight it was added with
//!
//! `sorted` always holds exactly the keys of `vnodes`. Both are only ever
//! changed together under the write guard, so readers never observe one
//! without the other.
//!
//! # Lookup
//!
//! A key hashes to a token `h`; its owner is the virtual node at the
//! smallest position `>= h`, wrapping to the first position when `h` is
//! past the last one. Binary search makes this O(log n) in the number of
//! virtual nodes.
//!
//! # Collisions
//!
//! Two virtual nodes hashing to the same position collide and the later
//! write wins. With 64-bit positions this is vanishingly rare and is not
//! treated as an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::node::{virtual_count, DEFAULT_WEIGHT};
use crate::partitioner::{Blake3Partitioner, Partitioner};
use crate::token::Token;
use crate::vnode::{self, VirtualNode};

/// Weighted consistent hash ring.
///
/// All methods take `&self`; share the ring between threads with `Arc`.
/// Mutations take an exclusive lock, lookups a shared one.
pub struct HashRing<P: Partitioner = Blake3Partitioner> {
    state: RwLock<RingState>,
    replication_factor: u32,
    partitioner: P,
}

#[derive(Debug, Default)]
struct RingState {
    vnodes: HashMap<Token, VirtualNode>,
    sorted: Vec<Token>,
    weights: HashMap<Arc<str>, f64>,
}

impl HashRing<Blake3Partitioner> {
    /// Creates an empty ring using the default BLAKE3 partitioner.
    ///
    /// `replication_factor` is the virtual-node count for a node of weight
    /// 1.0. A factor of 0 is allowed: every node then gets zero virtual
    /// nodes and the ring never resolves a key.
    pub fn new(replication_factor: u32) -> Self {
        Self::with_partitioner(replication_factor, Blake3Partitioner)
    }
}

impl Default for HashRing<Blake3Partitioner> {
    fn default() -> Self {
        Self::new(super::DEFAULT_REPLICATION_FACTOR)
    }
}

impl<P: Partitioner> HashRing<P> {
    /// Creates an empty ring that places keys and virtual nodes with
    /// `partitioner`.
    pub fn with_partitioner(replication_factor: u32, partitioner: P) -> Self {
        Self {
            state: RwLock::new(RingState::default()),
            replication_factor,
            partitioner,
        }
    }

    /// Adds `node` with `weight`, placing `round(weight * replication_factor)`
    /// virtual nodes.
    ///
    /// Re-adding a node replaces it: its previous virtual nodes are removed
    /// before the new ones are placed, atomically with respect to readers.
    /// A weight that is not strictly positive (or not finite) records the
    /// node but places nothing, so it owns no keys. Very large weights are
    /// clamped to [`MAX_VNODES_PER_NODE`](crate::node::MAX_VNODES_PER_NODE)
    /// virtual nodes.
    pub fn add_node(&self, node: &str, weight: f64) {
        let mut state = self.state.write();
        self.insert_locked(&mut state, node, weight);
    }

    /// Adds several nodes under a single exclusive hold.
    pub fn add_nodes<I, S>(&self, nodes: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut state = self.state.write();
        for (node, weight) in nodes {
            self.insert_locked(&mut state, node.as_ref(), weight);
        }
    }

    /// Removes `node` and all of its virtual nodes.
    ///
    /// The virtual-node count is recomputed from the recorded weight; a
    /// node with no recorded weight is assumed to have [`DEFAULT_WEIGHT`].
    /// Removing an unknown node changes nothing.
    pub fn remove_node(&self, node: &str) {
        let mut state = self.state.write();
        let weight = match state.weights.remove(node) {
            Some(weight) => weight,
            None => {
                trace!(node, "removing untracked node, assuming default weight");
                DEFAULT_WEIGHT
            }
        };
        let count = virtual_count(weight, self.replication_factor);
        let removed = state.unplace(node, count, &self.partitioner);
        if removed > 0 {
            debug!(node, weight, vnodes = removed, "removed node from ring");
        }
    }

    /// Removes every node.
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = RingState::default();
        debug!("cleared ring");
    }

    /// Returns the real node owning `key`, or `None` if the ring has no
    /// virtual nodes.
    pub fn get_node(&self, key: impl AsRef<[u8]>) -> Option<Arc<str>> {
        let token = self.partitioner.token(key.as_ref());
        let state = self.state.read();
        state.successor(token).map(|vnode| Arc::clone(vnode.node()))
    }

    /// Returns the virtual node owning `key`.
    pub fn get_vnode(&self, key: impl AsRef<[u8]>) -> Option<VirtualNode> {
        let token = self.partitioner.token(key.as_ref());
        let state = self.state.read();
        state.successor(token).cloned()
    }

    /// Position `key` hashes to under this ring's partitioner.
    pub fn token_for(&self, key: impl AsRef<[u8]>) -> Token {
        self.partitioner.token(key.as_ref())
    }

    /// Virtual nodes placed for a node of weight 1.0.
    pub fn replication_factor(&self) -> u32 {
        self.replication_factor
    }

    /// Name of the partitioner placing keys and virtual nodes.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Number of real nodes recorded, including ones with zero virtual nodes.
    pub fn node_count(&self) -> usize {
        self.state.read().weights.len()
    }

    /// Number of occupied positions on the ring.
    pub fn vnode_count(&self) -> usize {
        self.state.read().vnodes.len()
    }

    /// True if no key can be resolved.
    pub fn is_empty(&self) -> bool {
        self.state.read().sorted.is_empty()
    }

    /// True if `node` is recorded, whether or not it has virtual nodes.
    pub fn contains_node(&self, node: &str) -> bool {
        self.state.read().weights.contains_key(node)
    }

    /// Recorded weight of `node`.
    pub fn weight(&self, node: &str) -> Option<f64> {
        self.state.read().weights.get(node).copied()
    }

    /// All real nodes and their weights, sorted by name.
    pub fn nodes(&self) -> Vec<(Arc<str>, f64)> {
        let state = self.state.read();
        let mut nodes: Vec<_> = state
            .weights
            .iter()
            .map(|(node, weight)| (Arc::clone(node), *weight))
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        nodes
    }

    /// Occupied positions in ascending order.
    pub fn positions(&self) -> Vec<Token> {
        self.state.read().sorted.clone()
    }

    /// Every position with its virtual node, in ring order.
    pub fn tokens(&self) -> Vec<(Token, VirtualNode)> {
        let state = self.state.read();
        state
            .sorted
            .iter()
            .filter_map(|pos| state.vnodes.get(pos).map(|vnode| (*pos, vnode.clone())))
            .collect()
    }

    /// Fraction of the key space each real node owns, sorted by name.
    ///
    /// A position owns the arc from the previous position (exclusive) up to
    /// itself (inclusive). Nodes without positions report 0.0. For a
    /// non-empty ring the fractions sum to 1.0.
    pub fn ownership(&self) -> Vec<(Arc<str>, f64)> {
        let state = self.state.read();
        let mut arcs: HashMap<&str, u128> = state
            .weights
            .keys()
            .map(|node| (&**node, 0u128))
            .collect();

        match state.sorted.as_slice() {
            [] => {}
            [only] => {
                if let Some(vnode) = state.vnodes.get(only) {
                    arcs.insert(&**vnode.node(), 1u128 << 64);
                }
            }
            sorted => {
                let mut prev = sorted[sorted.len() - 1];
                for pos in sorted {
                    if let Some(vnode) = state.vnodes.get(pos) {
                        *arcs.entry(&**vnode.node()).or_default() +=
                            u128::from(prev.distance_to(pos).value());
                    }
                    prev = *pos;
                }
            }
        }

        let circle = (1u128 << 64) as f64;
        let mut shares: Vec<_> = state
            .weights
            .keys()
            .map(|node| {
                let arc = arcs.get(&**node).copied().unwrap_or(0);
                (Arc::clone(node), arc as f64 / circle)
            })
            .collect();
        shares.sort_by(|a, b| a.0.cmp(&b.0));
        shares
    }

    fn insert_locked(&self, state: &mut RingState, node: &str, weight: f64) {
        if let Some(previous) = state.weights.get(node).copied() {
            let count = virtual_count(previous, self.replication_factor);
            state.unplace(node, count, &self.partitioner);
            trace!(node, previous, weight, "replacing existing node");
        }

        let node: Arc<str> = Arc::from(node);
        let count = virtual_count(weight, self.replication_factor);
        let placed = state.place(&node, count, &self.partitioner);
        state.weights.insert(Arc::clone(&node), weight);
        debug!(node = %node, weight, vnodes = placed, "added node to ring");
    }
}

impl RingState {
    /// Places replicas `0..count` of `node`. Returns how many new positions
    /// were occupied (collisions overwrite an existing position).
    fn place<P: Partitioner>(&mut self, node: &Arc<str>, count: u32, partitioner: &P) -> usize {
        let mut fresh = Vec::with_capacity(count as usize);
        for index in 0..count {
            let vnode = VirtualNode::new(Arc::clone(node), index);
            let pos = vnode.position(partitioner);
            if let Some(evicted) = self.vnodes.insert(pos, vnode) {
                trace!(position = %pos, evicted = %evicted, "virtual node collision");
            } else {
                fresh.push(pos);
            }
        }

        if !fresh.is_empty() {
            let placed = fresh.len();
            self.sorted.extend(fresh);
            self.sorted.sort_unstable();
            placed
        } else {
            0
        }
    }

    /// Removes replicas `0..count` of `node` that still occupy their
    /// position, then drops vacated positions from `sorted`.
    fn unplace<P: Partitioner>(&mut self, node: &str, count: u32, partitioner: &P) -> usize {
        let mut removed = 0;
        for index in 0..count {
            let pos = vnode::position(partitioner, node, index);
            let owned = self
                .vnodes
                .get(&pos)
                .is_some_and(|vnode| vnode.is_owned_by(node) && vnode.index() == index);
            if owned {
                self.vnodes.remove(&pos);
                removed += 1;
            }
        }

        if removed > 0 {
            let vnodes = &self.vnodes;
            self.sorted.retain(|pos| vnodes.contains_key(pos));
        }
        removed
    }

    fn successor(&self, token: Token) -> Option<&VirtualNode> {
        let idx = self.sorted.partition_point(|pos| *pos < token);
        let pos = self.sorted.get(idx).or_else(|| self.sorted.first())?;
        self.vnodes.get(pos)
    }
}

impl<P: Partitioner> fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("replication_factor", &self.replication_factor)
            .field("partitioner", &self.partitioner.name())
            .field("nodes", &state.weights.len())
            .field("vnodes", &state.vnodes.len())
            .finish()
    }
}
