//! athene CLI - Inspect and maintain Q-tables learned by scripted agents
//!
//! Logging goes through `tracing`; set `RUST_LOG` (for example
//! `RUST_LOG=athene=debug`) or pass `--verbose` to see more.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "athene")]
#[command(version, about = "Inspect and maintain stored Q-learning tables", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a stored Q-table
    Inspect(athene::cli::commands::inspect::InspectArgs),

    /// Export a stored Q-table as CSV or JSON
    Export(athene::cli::commands::export::ExportArgs),

    /// Delete a stored Q-table
    Reset(athene::cli::commands::reset::ResetArgs),

    /// Summarize recorded episode scores
    Scores(athene::cli::commands::scores::ScoresArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Inspect(args) => athene::cli::commands::inspect::execute(args),
        Commands::Export(args) => athene::cli::commands::export::execute(args),
        Commands::Reset(args) => athene::cli::commands::reset::execute(args),
        Commands::Scores(args) => athene::cli::commands::scores::execute(args),
    }
}
