//! `estatectl` - CLI for estate-access
//!
//! This binary provides the command-line interface for logging in, viewing
//! the dashboard, and managing resident access records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::Parser;

use estate_access::cli::{self, Cli};
use estate_access::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    // Execute the command
    cli::execute(cli.command, &config, color, &mut out).await?;
    Ok(())
}
