//! BLAKE3 partitioner, the ring's default hash.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// Hash arbitrary bytes onto the ring.
///
/// Takes the leading 8 bytes of the BLAKE3 digest, big-endian.
pub fn hash(input: &[u8]) -> Token {
    let digest = ::blake3::hash(input);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    Token(u64::from_be_bytes(prefix))
}

/// Cryptographic partitioner backed by BLAKE3.
///
/// Slower than [`Xxh3Partitioner`](crate::partitioner::Xxh3Partitioner)
/// but gives the same positions on every platform and implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn token(&self, input: &[u8]) -> Token {
        hash(input)
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash(b"key"), hash(b"key"));
        assert_eq!(Blake3Partitioner.token(b"key"), hash(b"key"));
    }

    #[test]
    fn test_hash_uses_big_endian_digest_prefix() {
        let digest = ::blake3::hash(b"server1");
        let bytes = digest.as_bytes();
        let expected = bytes[..8]
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        assert_eq!(hash(b"server1"), Token(expected));
    }

    #[test]
    fn test_different_inputs_spread() {
        let tokens: std::collections::HashSet<Token> =
            (0..1000).map(|i| hash(format!("key{i}").as_bytes())).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
