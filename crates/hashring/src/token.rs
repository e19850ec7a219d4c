//! Token positions on the hash ring.
//!
//! A token is a point on the circular `u64` space. Positions grow
//! clockwise and wrap from `u64::MAX` back to `0`.

use serde::Serialize;
use std::fmt;

/// Position on the ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct Token(pub u64);

impl Token {
    /// Minimum token value (start of ring).
    pub const fn zero() -> Self {
        Token(0)
    }

    /// Maximum token value (end of ring).
    pub const fn max() -> Self {
        Token(u64::MAX)
    }

    /// True if this token is the minimum.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True if this token is the maximum.
    pub fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// The full circle (`self == other` going all the way round) is not
    /// representable in `u64`; equal tokens have distance zero.
    pub fn distance_to(&self, other: &Self) -> Self {
        Token(other.0.wrapping_sub(self.0))
    }

    /// Raw position value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bounds() {
        assert!(Token::zero().is_zero());
        assert!(Token::max().is_max());
        assert!(Token::zero() < Token::max());
    }

    #[test]
    fn test_distance_forward() {
        assert_eq!(Token(100).distance_to(&Token(200)), Token(100));
    }

    #[test]
    fn test_distance_wraps() {
        // 10 steps to reach MAX, one more to reach 0, five more to reach 5
        let from = Token(u64::MAX - 10);
        assert_eq!(from.distance_to(&Token(5)), Token(16));
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(Token(0xab).to_string(), "00000000000000ab");
    }
}
