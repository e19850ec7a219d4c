//! Fluent construction of a pre-populated ring.

use crate::node::NodeSpec;
use crate::partitioner::{Blake3Partitioner, Partitioner};
use crate::ring::{HashRing, DEFAULT_REPLICATION_FACTOR};

/// Builder for [`HashRing`].
///
/// ```
/// use hashring::{RingBuilder, Xxh3Partitioner};
///
/// let ring = RingBuilder::new()
///     .with_replication_factor(8)
///     .with_partitioner(Xxh3Partitioner)
///     .add_node("node1")
///     .add_weighted_node("node2", 2.0)
///     .build();
///
/// assert_eq!(ring.vnode_count(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<P = Blake3Partitioner> {
    replication_factor: u32,
    partitioner: P,
    nodes: Vec<NodeSpec>,
}

impl RingBuilder<Blake3Partitioner> {
    pub fn new() -> Self {
        Self {
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            partitioner: Blake3Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<Blake3Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    /// Virtual nodes per unit of weight (default [`DEFAULT_REPLICATION_FACTOR`]).
    pub fn with_replication_factor(mut self, replication_factor: u32) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Swap the hash function used for keys and virtual nodes.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            replication_factor: self.replication_factor,
            partitioner,
            nodes: self.nodes,
        }
    }

    /// Add a node with the default weight.
    pub fn add_node(self, name: impl Into<String>) -> Self {
        self.add_spec(NodeSpec::unweighted(name))
    }

    pub fn add_weighted_node(self, name: impl Into<String>, weight: f64) -> Self {
        self.add_spec(NodeSpec::new(name, weight))
    }

    pub fn add_spec(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    /// Build the ring. Nodes are added in the order given, so a name that
    /// appears twice ends up with its last weight.
    pub fn build(self) -> HashRing<P> {
        let ring = HashRing::with_partitioner(self.replication_factor, self.partitioner);
        ring.add_nodes(self.nodes.into_iter().map(|spec| (spec.name, spec.weight)));
        ring
    }
}
