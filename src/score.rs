//! Episode score log.
//!
//! Appends one score per finished episode to `score.csv` inside a data
//! directory, next to the persisted Q-table, so learning progress across
//! runs can be plotted.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// File name of the score log inside a data directory
pub const SCORE_FILE: &str = "score.csv";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScoreRecord {
    score: f64,
}

/// Summary statistics over a score log
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub episodes: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub last: f64,
}

impl ScoreSummary {
    /// Summarize a sequence of scores, `None` when it is empty.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let last = *scores.last()?;
        let total: f64 = scores.iter().sum();
        Some(Self {
            episodes: scores.len(),
            mean: total / scores.len() as f64,
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            last,
        })
    }
}

/// Append-only CSV log of episode scores
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    /// Log stored in `dir/score.csv`. Nothing is written until the first record.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(SCORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one episode score, writing the header if the log is new.
    pub fn record(&self, score: f64) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| Error::Io {
                operation: format!("create directory {dir:?}"),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::Io {
                operation: format!("open score log {:?}", self.path),
                source,
            })?;
        let is_new = file
            .metadata()
            .map_err(|source| Error::Io {
                operation: format!("inspect score log {:?}", self.path),
                source,
            })?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(ScoreRecord { score })?;
        writer.flush()?;
        Ok(())
    }

    /// All recorded scores in order. A missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<f64>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open score log {:?}", self.path),
                    source,
                });
            }
        };

        let mut reader = csv::Reader::from_reader(file);
        reader
            .deserialize::<ScoreRecord>()
            .map(|record| record.map(|r| r.score).map_err(Error::from))
            .collect()
    }

    pub fn summary(&self) -> Result<Option<ScoreSummary>> {
        Ok(ScoreSummary::from_scores(&self.read_all()?))
    }
}
