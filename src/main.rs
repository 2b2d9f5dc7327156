//! musebox - headless driver for the music player core.
//!
//! Lists a folder the way the player orders it, or plays it against a
//! simulated audio device.

use clap::{CommandFactory, Parser};
use musebox::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("musebox=info".parse()?))
        .init();

    if !cli::run_command(&args)? {
        // No command specified
        cli::Cli::command().print_help()?;
    }
    Ok(())
}
