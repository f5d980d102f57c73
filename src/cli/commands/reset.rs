//! Reset command - Delete a stored Q-table

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{adapters::GzipRepository, ports::TableRepository};

#[derive(Parser, Debug)]
#[command(about = "Delete the stored Q-table so the next run starts empty")]
pub struct ResetArgs {
    /// Data directory holding qlearn.gz
    pub dir: PathBuf,
}

pub fn execute(args: ResetArgs) -> Result<()> {
    GzipRepository::new().discard(&args.dir)?;
    println!("✓ Q-table removed from: {}", args.dir.display());
    Ok(())
}
