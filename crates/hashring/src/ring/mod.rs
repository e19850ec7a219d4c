//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node positions and provides efficient lookup
//! operations for finding the node responsible for a key.

pub mod builder;
pub mod ring;

pub use builder::RingBuilder;
pub use ring::HashRing;

/// Base number of virtual nodes for a node of weight 1.0.
pub const DEFAULT_REPLICATION_FACTOR: u32 = 50;
