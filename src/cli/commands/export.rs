//! Export command - Re-export a stored Q-table

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{cli::commands::read_snapshot, export::TableCsvExporter};

#[derive(Parser, Debug)]
#[command(about = "Export a stored Q-table")]
pub struct ExportArgs {
    /// Data directory holding qlearn.gz
    pub dir: PathBuf,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// One row per state, one column per action
    Csv,
    /// The full snapshot including action masks
    Json,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let snapshot = read_snapshot(&args.dir)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create file: {}", args.output.display()))?;
    let writer = BufWriter::new(file);

    match args.format {
        ExportFormat::Csv => TableCsvExporter::write(&snapshot, writer)?,
        ExportFormat::Json => serde_json::to_writer_pretty(writer, &snapshot)
            .context("Failed to write JSON export")?,
    }

    println!(
        "✓ Exported {} states to: {}",
        snapshot.state_count(),
        args.output.display()
    );
    Ok(())
}
