//! CLI entry point for the `hashring` tool.

use clap::Parser;
use hashring_cli::CliConfig;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    hashring_cli::logging::init(config.verbose);
    config.run()
}
