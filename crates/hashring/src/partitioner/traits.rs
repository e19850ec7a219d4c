//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts bytes into tokens for placement on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead. The same input must
/// always produce the same token within a process.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a byte sequence into a token.
    fn token(&self, input: &[u8]) -> Token;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
