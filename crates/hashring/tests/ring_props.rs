//! Property tests: arbitrary membership histories keep the ring coherent.

use std::collections::HashMap;

use hashring::HashRing;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(String, f64),
    Remove(String),
}

fn node_name() -> impl Strategy<Value = String> {
    // Small alphabet, including separators, so names repeat and collide textually.
    "[ab#:=]{1,4}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (node_name(), -1.0f64..4.0).prop_map(|(name, weight)| Op::Add(name, weight)),
        1 => node_name().prop_map(Op::Remove),
    ]
}

fn expected_vnodes(weight: f64, replication_factor: u32) -> usize {
    if weight.is_finite() && weight > 0.0 {
        (weight * f64::from(replication_factor)).round() as usize
    } else {
        0
    }
}

proptest! {
    /// Property: after any history the index matches a model of live nodes.
    #[test]
    fn prop_index_matches_model(
        replication_factor in 0u32..16,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let ring = HashRing::new(replication_factor);
        let mut model: HashMap<String, f64> = HashMap::new();

        for op in &ops {
            match op {
                Op::Add(name, weight) => {
                    ring.add_node(name, *weight);
                    model.insert(name.clone(), *weight);
                }
                Op::Remove(name) => {
                    ring.remove_node(name);
                    model.remove(name);
                }
            }
        }

        let positions = ring.positions();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(positions.len(), ring.vnode_count());
        prop_assert_eq!(ring.node_count(), model.len());

        let expected: usize = model
            .values()
            .map(|w| expected_vnodes(*w, replication_factor))
            .sum();
        prop_assert_eq!(ring.vnode_count(), expected);
        prop_assert_eq!(ring.is_empty(), expected == 0);
    }

    /// Property: lookups are stable and always name a live, placed node.
    #[test]
    fn prop_lookup_resolves_to_live_node(
        specs in prop::collection::vec((node_name(), 0.1f64..3.0), 1..6),
        keys in prop::collection::vec(any::<Vec<u8>>(), 1..30),
    ) {
        let ring = HashRing::new(8);
        for (name, weight) in &specs {
            ring.add_node(name, *weight);
        }

        for key in &keys {
            let first = ring.get_node(key);
            prop_assert_eq!(&first, &ring.get_node(key));
            if let Some(owner) = first {
                prop_assert!(ring.contains_node(&owner));
            } else {
                prop_assert!(ring.is_empty());
            }
        }
    }
}
