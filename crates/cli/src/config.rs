//! Command-line configuration.

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use hashring::{Blake3Partitioner, HashRing, NodeSpec, Partitioner, Xxh3Partitioner};
use tracing::info;

use crate::commands::{Command, CommandResult};

/// Inspect key placement on a weighted consistent hash ring.
#[derive(Parser, Debug, Clone)]
#[command(name = "hashring", version, about, long_about = None)]
pub struct CliConfig {
    /// Virtual nodes per unit of weight
    #[arg(
        short = 'r',
        long,
        global = true,
        default_value_t = hashring::DEFAULT_REPLICATION_FACTOR
    )]
    pub replication_factor: u32,

    /// Hash function used to place keys and virtual nodes
    #[arg(long = "hash", value_enum, global = true, default_value_t = HashAlgorithm::Blake3)]
    pub hash: HashAlgorithm,

    /// Report format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Xxh3,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl CliConfig {
    /// Run the selected command and print its report to stdout.
    pub fn run(&self) -> Result<()> {
        let result = self.execute();
        println!("{}", result.render(self.format)?);
        Ok(())
    }

    /// Build the ring and run the selected command against it.
    pub fn execute(&self) -> CommandResult {
        match self.hash {
            HashAlgorithm::Blake3 => self.execute_with(Blake3Partitioner),
            HashAlgorithm::Xxh3 => self.execute_with(Xxh3Partitioner),
        }
    }

    fn execute_with<P: Partitioner>(&self, partitioner: P) -> CommandResult {
        let ring = HashRing::with_partitioner(self.replication_factor, partitioner);
        let nodes = self.command.nodes();
        ring.add_nodes(nodes.iter().map(|spec| (spec.name.as_str(), spec.weight)));
        info!(
            nodes = nodes.len(),
            vnodes = ring.vnode_count(),
            replication_factor = self.replication_factor,
            partitioner = ring.partitioner_name(),
            "seeded ring"
        );
        self.command.execute(&ring)
    }
}

/// Nodes used when none are given on the command line.
pub fn default_nodes() -> Vec<NodeSpec> {
    ["server1", "server2", "server3"]
        .into_iter()
        .map(NodeSpec::unweighted)
        .collect()
}
