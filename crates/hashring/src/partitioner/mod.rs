//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting bytes (keys and serialized
//! virtual nodes) into tokens that can be placed on the hash ring.

pub mod blake3;
pub mod traits;
pub mod xxh3;

pub use self::blake3::{hash, Blake3Partitioner};
pub use self::traits::Partitioner;
pub use self::xxh3::Xxh3Partitioner;
