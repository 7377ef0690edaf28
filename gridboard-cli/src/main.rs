//! gridboard command-line tool
//!
//! Usage:
//!   gridboard --database board.db migrate
//!   gridboard --database board.db import-classes classes.json
//!   gridboard --database board.db components

use anyhow::Result;
use clap::Parser;
use gridboard_cli::{Cli, run};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}
