//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Counting how generated keys distribute over a set of nodes
//! - Looking up the owner of specific keys
//! - Measuring how many keys move when a node joins
//! - Reporting each node's share of the key space

pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, HashAlgorithm, OutputFormat};
