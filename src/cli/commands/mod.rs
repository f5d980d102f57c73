//! Subcommands of the athene CLI

pub mod export;
pub mod inspect;
pub mod reset;
pub mod scores;

use std::path::Path;

use anyhow::{Result, anyhow};

use crate::{adapters::GzipRepository, ports::TableRepository, q_learning::SavedQTable};

/// Read the table stored in `dir`, failing if there is none.
pub(crate) fn read_snapshot(dir: &Path) -> Result<SavedQTable> {
    GzipRepository::new()
        .read(dir)?
        .ok_or_else(|| anyhow!("No readable Q-table found in {}", dir.display()))
}
