//! XXH3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;
use xxhash_rust::xxh3::xxh3_64;

/// Fast non-cryptographic partitioner (XXH3, 64-bit).
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn token(&self, input: &[u8]) -> Token {
        Token(xxh3_64(input))
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
