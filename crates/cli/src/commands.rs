//! Subcommands and their reports.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hashring::{HashRing, NodeSpec, Partitioner, Token};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{default_nodes, OutputFormat};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count how many generated keys land on each node
    Distribute {
        #[command(flatten)]
        nodes: NodeArgs,
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Print the owner of each key
    Lookup {
        #[command(flatten)]
        nodes: NodeArgs,
        /// Keys to resolve
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Add a node and report how the distribution changes
    Rebalance {
        #[command(flatten)]
        nodes: NodeArgs,
        /// Node to add, as NAME or NAME=WEIGHT
        #[arg(long, value_name = "NAME[=WEIGHT]")]
        add: NodeSpec,
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Report each node's share of the key space
    Ownership {
        #[command(flatten)]
        nodes: NodeArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
    /// Node to seed, as NAME or NAME=WEIGHT (repeatable; default server1..server3)
    #[arg(short = 'n', long = "node", value_name = "NAME[=WEIGHT]")]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Number of keys to generate
    #[arg(short = 'k', long = "keys", default_value_t = 100)]
    pub count: usize,

    /// Prefix of generated keys ("{prefix}{i}")
    #[arg(long, default_value = "key")]
    pub key_prefix: String,
}

impl KeyArgs {
    fn generate(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.count).map(move |i| format!("{}{}", self.key_prefix, i))
    }
}

impl Command {
    /// Nodes to seed the ring with.
    pub fn nodes(&self) -> Vec<NodeSpec> {
        let args = match self {
            Command::Distribute { nodes, .. }
            | Command::Lookup { nodes, .. }
            | Command::Rebalance { nodes, .. }
            | Command::Ownership { nodes } => nodes,
        };
        if args.nodes.is_empty() {
            default_nodes()
        } else {
            args.nodes.clone()
        }
    }

    /// Run against an already seeded ring.
    pub fn execute<P: Partitioner>(&self, ring: &HashRing<P>) -> CommandResult {
        match self {
            Command::Distribute { keys, .. } => {
                CommandResult::Distribution(Distribution::measure(ring, keys.generate()))
            }
            Command::Lookup { keys, .. } => {
                let assignments = keys
                    .iter()
                    .map(|key| Assignment {
                        key: key.clone(),
                        token: ring.token_for(key),
                        node: ring.get_node(key).map(|node| node.to_string()),
                    })
                    .collect();
                CommandResult::Lookup { assignments }
            }
            Command::Rebalance { add, keys, .. } => {
                let keys: Vec<String> = keys.generate().collect();
                let owners_before: Vec<_> = keys.iter().map(|k| ring.get_node(k)).collect();
                let before = Distribution::measure(ring, keys.iter());

                ring.add_node(&add.name, add.weight);
                info!(node = %add.name, weight = add.weight, "added node");

                let owners_after: Vec<_> = keys.iter().map(|k| ring.get_node(k)).collect();
                let after = Distribution::measure(ring, keys.iter());
                let moved = owners_before
                    .iter()
                    .zip(&owners_after)
                    .filter(|(b, a)| b != a)
                    .count();
                debug!(moved, total = keys.len(), "rebalance complete");

                CommandResult::Rebalance {
                    added: add.clone(),
                    moved,
                    before,
                    after,
                }
            }
            Command::Ownership { .. } => CommandResult::Ownership {
                shares: ring
                    .ownership()
                    .into_iter()
                    .map(|(node, share)| Share {
                        node: node.to_string(),
                        share,
                    })
                    .collect(),
            },
        }
    }
}

/// Outcome of a command, renderable as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Distribution(Distribution),
    Lookup {
        assignments: Vec<Assignment>,
    },
    Rebalance {
        added: NodeSpec,
        moved: usize,
        before: Distribution,
        after: Distribution,
    },
    Ownership {
        shares: Vec<Share>,
    },
}

/// Per-node key counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub total: usize,
    /// Keys no node owned (empty ring).
    pub unassigned: usize,
    /// Every node on the ring, sorted by name, including ones with no keys.
    pub counts: Vec<NodeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCount {
    pub node: String,
    pub keys: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub key: String,
    /// Position the key hashes to.
    pub token: Token,
    pub node: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub node: String,
    pub share: f64,
}

impl Distribution {
    fn measure<P, I, K>(ring: &HashRing<P>, keys: I) -> Self
    where
        P: Partitioner,
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut counts: BTreeMap<String, usize> = ring
            .nodes()
            .into_iter()
            .map(|(node, _)| (node.to_string(), 0))
            .collect();
        let mut total = 0;
        let mut unassigned = 0;

        for key in keys {
            total += 1;
            match ring.get_node(key) {
                Some(node) => *counts.entry(node.to_string()).or_default() += 1,
                None => unassigned += 1,
            }
        }

        Distribution {
            total,
            unassigned,
            counts: counts
                .into_iter()
                .map(|(node, keys)| NodeCount { node, keys })
                .collect(),
        }
    }

    fn write_text(&self, out: &mut String) {
        let width = self.counts.iter().map(|c| c.node.len()).max().unwrap_or(4).max(4);
        for count in &self.counts {
            let pct = if self.total == 0 {
                0.0
            } else {
                100.0 * count.keys as f64 / self.total as f64
            };
            let _ = writeln!(out, "{:<width$}  {:>8}  {:>6.2}%", count.node, count.keys, pct);
        }
        if self.unassigned > 0 {
            let _ = writeln!(out, "{:<width$}  {:>8}", "<none>", self.unassigned);
        }
    }
}

impl CommandResult {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize report")
            }
            OutputFormat::Text => Ok(self.to_text()),
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            CommandResult::Distribution(dist) => dist.write_text(&mut out),
            CommandResult::Lookup { assignments } => {
                for a in assignments {
                    let _ = writeln!(out, "{} -> {}", a.key, a.node.as_deref().unwrap_or("<none>"));
                }
            }
            CommandResult::Rebalance {
                added,
                moved,
                before,
                after,
            } => {
                out.push_str("before:\n");
                before.write_text(&mut out);
                let _ = writeln!(out, "after adding {}:", added.name);
                after.write_text(&mut out);
                let _ = writeln!(out, "moved: {moved}/{}", after.total);
            }
            CommandResult::Ownership { shares } => {
                let width = shares.iter().map(|s| s.node.len()).max().unwrap_or(4).max(4);
                for s in shares {
                    let _ = writeln!(out, "{:<width$}  {:>6.2}%", s.node, 100.0 * s.share);
                }
            }
        }
        // println! supplies the final newline
        if out.ends_with('\n') {
            out.pop();
        }
        out
    }
}
