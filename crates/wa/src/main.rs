//! WA CLI - Widget area swapping.
//!
//! Provides commands for:
//! - `resolve`: Print the replacement decision for each default area
//! - `swap`: Print content lists after replacement
//! - `check`: Validate stored rule records

mod commands;
mod error;
mod fixtures;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ResolveArgs, SwapArgs};
use output::Output;

/// WA - Widget area swapping.
#[derive(Parser)]
#[command(name = "wa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the replacement decision for each default area.
    Resolve(ResolveArgs),
    /// Print content lists after replacement.
    Swap(SwapArgs),
    /// Validate stored rule records.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Resolve(args) => args.fixtures.verbose,
            Self::Swap(args) => args.fixtures.verbose,
            Self::Check(args) => args.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(),
        Commands::Swap(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
