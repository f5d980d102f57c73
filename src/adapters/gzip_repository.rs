//! Filesystem implementation of the table repository.
//!
//! A location is a directory holding two files:
//!
//! - `qlearn.gz`: the table as gzip-compressed MessagePack, used for reloading
//! - `qlearn.csv`: the same values as a plain table for inspection
//!
//! Each file is written to a temporary file in the same directory and
//! renamed into place, so an interrupted save never leaves a torn file and a
//! failure while writing one file does not affect the other.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::{
    Result, error::Error, export::TableCsvExporter, ports::TableRepository,
    q_learning::SavedQTable,
};

/// File name of the compressed table inside a location
pub const TABLE_FILE: &str = "qlearn.gz";
/// File name of the tabular export inside a location
pub const EXPORT_FILE: &str = "qlearn.csv";

/// Directory-based repository using gzip-compressed MessagePack.
///
/// # Examples
///
/// ```no_run
/// use athene::{ActionSet, QLearningAgent, adapters::GzipRepository, ports::TableRepository};
/// use std::path::Path;
///
/// let repo = GzipRepository::new();
/// let agent = QLearningAgent::with_defaults(ActionSet::new(["donothing", "attack"])?);
///
/// repo.save(&agent, Path::new("memory/simple"))?;
/// assert!(GzipRepository::table_path(Path::new("memory/simple")).exists());
/// # Ok::<(), athene::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipRepository;

impl GzipRepository {
    /// Create a new filesystem repository.
    pub fn new() -> Self {
        Self
    }

    /// Path of the compressed table for a location
    pub fn table_path(location: &Path) -> PathBuf {
        location.join(TABLE_FILE)
    }

    /// Path of the CSV export for a location
    pub fn export_path(location: &Path) -> PathBuf {
        location.join(EXPORT_FILE)
    }
}

impl TableRepository for GzipRepository {
    fn read(&self, location: &Path) -> Result<Option<SavedQTable>> {
        let path = Self::table_path(location);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("read Q-table {path:?}"),
                    source,
                });
            }
        };

        match SavedQTable::from_compressed_bytes(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable Q-table");
                Ok(None)
            }
        }
    }

    fn write(&self, snapshot: &SavedQTable, location: &Path) -> Result<()> {
        fs::create_dir_all(location).map_err(|source| Error::Io {
            operation: format!("create directory {location:?}"),
            source,
        })?;

        let bytes = snapshot.to_compressed_bytes()?;
        write_atomically(&Self::table_path(location), |file| {
            file.write_all(&bytes).map_err(Error::from)
        })?;

        write_atomically(&Self::export_path(location), |file| {
            TableCsvExporter::write(snapshot, file)
        })
    }

    fn discard(&self, location: &Path) -> Result<()> {
        for path in [Self::table_path(location), Self::export_path(location)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(Error::Io {
                        operation: format!("remove {path:?}"),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Write `path` through a temporary sibling file that is renamed on success.
///
/// The temporary file is deleted when writing fails.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        operation: format!("create temporary file in {dir:?}"),
        source,
    })?;

    write(&mut temp)?;
    temp.as_file().sync_all().map_err(|source| Error::Io {
        operation: format!("sync temporary file for {path:?}"),
        source,
    })?;

    temp.persist(path).map_err(|e| Error::Io {
        operation: format!("move temporary file into {path:?}"),
        source: e.error,
    })?;
    Ok(())
}
