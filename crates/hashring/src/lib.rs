//! Weighted consistent-hashing ring.
//!
//! This crate maps an unbounded key space onto a dynamic set of named nodes:
//! - Token positions on a 64-bit circular space
//! - Pluggable partitioners (hash functions) that turn bytes into tokens
//! - Virtual nodes, `round(weight * replication_factor)` per real node
//! - A thread-safe ring with successor-search lookup
//!
//! ```
//! use hashring::HashRing;
//!
//! let ring = HashRing::new(50);
//! ring.add_node("server1", 1.0);
//! ring.add_node("server2", 2.0);
//!
//! let owner = ring.get_node("user:42").expect("ring is not empty");
//! assert!(&*owner == "server1" || &*owner == "server2");
//! ```

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod vnode;

pub use error::{Error, Result};
pub use node::{NodeSpec, DEFAULT_WEIGHT, MAX_VNODES_PER_NODE};
pub use partitioner::{hash, Blake3Partitioner, Partitioner, Xxh3Partitioner};
pub use ring::{HashRing, RingBuilder, DEFAULT_REPLICATION_FACTOR};
pub use token::Token;
pub use vnode::VirtualNode;
