//! Real node descriptions.
//!
//! A real node is a caller-chosen identity plus a weight. The ring stores
//! the weight and derives `round(weight * replication_factor)` virtual
//! nodes from it.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Weight assumed when none is given, and when removing a node whose
/// weight was never recorded.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Upper bound on the virtual nodes a single real node may occupy.
///
/// Larger weights are clamped to it, so a huge but finite weight still
/// places a bounded number of positions.
pub const MAX_VNODES_PER_NODE: u32 = 1 << 16;

/// Number of virtual nodes a node of `weight` receives.
///
/// Rounds to nearest, then clamps to [`MAX_VNODES_PER_NODE`]. Weights that
/// are not strictly positive, or not finite, give zero virtual nodes: the
/// node is accepted but unreachable.
pub fn virtual_count(weight: f64, replication_factor: u32) -> u32 {
    if !weight.is_finite() || weight <= 0.0 {
        return 0;
    }
    let count = (weight * f64::from(replication_factor)).round();
    if count >= f64::from(MAX_VNODES_PER_NODE) {
        MAX_VNODES_PER_NODE
    } else {
        count as u32
    }
}

/// A node name with its weight, as given on a command line or in config.
///
/// Parses from `"name"` (weight [`DEFAULT_WEIGHT`]) or `"name=weight"`.
/// The weight is split off at the *last* `=`, so names may contain `=`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSpec {
    pub name: String,
    pub weight: f64,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// Node with [`DEFAULT_WEIGHT`].
    pub fn unweighted(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_WEIGHT)
    }
}

impl FromStr for NodeSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, weight) = match s.rsplit_once('=') {
            Some((name, raw)) => {
                let weight = raw.trim().parse::<f64>().map_err(|_| Error::InvalidWeight {
                    node: name.to_string(),
                    value: raw.to_string(),
                })?;
                (name.trim(), weight)
            }
            None => (s, DEFAULT_WEIGHT),
        };

        if name.is_empty() {
            return Err(Error::InvalidNode(format!("empty node name in {s:?}")));
        }

        Ok(NodeSpec::new(name, weight))
    }
}

impl fmt::Display for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_count_rounds_to_nearest() {
        assert_eq!(virtual_count(1.0, 50), 50);
        assert_eq!(virtual_count(2.0, 50), 100);
        assert_eq!(virtual_count(0.5, 3), 2); // 1.5 rounds away from zero
        assert_eq!(virtual_count(0.3, 3), 1); // 0.9
        assert_eq!(virtual_count(0.1, 3), 0); // 0.3
    }

    #[test]
    fn test_virtual_count_degenerate_inputs() {
        assert_eq!(virtual_count(1.0, 0), 0);
        assert_eq!(virtual_count(0.0, 50), 0);
        assert_eq!(virtual_count(-2.0, 50), 0);
        assert_eq!(virtual_count(f64::NAN, 50), 0);
        assert_eq!(virtual_count(f64::INFINITY, 50), 0);
    }

    #[test]
    fn test_virtual_count_clamps_huge_weights() {
        assert_eq!(virtual_count(1e10, 50), MAX_VNODES_PER_NODE);
        assert_eq!(virtual_count(f64::MAX, 1), MAX_VNODES_PER_NODE);
        assert_eq!(virtual_count(1.0, u32::MAX), MAX_VNODES_PER_NODE);
        assert_eq!(
            virtual_count(f64::from(MAX_VNODES_PER_NODE) - 1.0, 1),
            MAX_VNODES_PER_NODE - 1
        );
    }

    #[test]
    fn test_parse_name_only() {
        let spec: NodeSpec = "server1".parse().unwrap();
        assert_eq!(spec, NodeSpec::new("server1", 1.0));
    }

    #[test]
    fn test_parse_weighted() {
        let spec: NodeSpec = "server2=2.5".parse().unwrap();
        assert_eq!(spec, NodeSpec::new("server2", 2.5));
    }

    #[test]
    fn test_parse_splits_on_last_equals() {
        let spec: NodeSpec = "a=b=3".parse().unwrap();
        assert_eq!(spec, NodeSpec::new("a=b", 3.0));
    }

    #[test]
    fn test_parse_accepts_degenerate_weight() {
        let spec: NodeSpec = "idle=0".parse().unwrap();
        assert_eq!(spec.weight, 0.0);
        let spec: NodeSpec = "drained=-1".parse().unwrap();
        assert_eq!(spec.weight, -1.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<NodeSpec>(), Err(Error::InvalidNode(_))));
        assert!(matches!("=2".parse::<NodeSpec>(), Err(Error::InvalidNode(_))));
        assert_eq!(
            "server1=heavy".parse::<NodeSpec>(),
            Err(Error::InvalidWeight {
                node: "server1".to_string(),
                value: "heavy".to_string(),
            })
        );
    }

    #[test]
    fn test_display_round_trips_name() {
        let spec = NodeSpec::new("server1", 2.0);
        assert_eq!(spec.to_string(), "server1=2");
    }
}
