//! Serialization support for Q-learning tables.

use std::{
    collections::BTreeMap,
    io::{Read, Write},
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Result,
    actions::{Action, ActionSet},
    config::QLearningConfig,
    error::Error,
    q_learning::{
        agent::{AgentState, QLearningAgent},
        masks::ActionMaskRegistry,
        q_table::QTable,
    },
    state::StateKey,
};

/// One persisted Q-table row, keyed by action name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRow {
    pub state: StateKey,
    pub values: BTreeMap<Action, f64>,
}

/// Persisted exclusion set of one state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedExclusion {
    pub state: StateKey,
    pub actions: Vec<Action>,
}

/// Serializable snapshot of a Q-learning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    /// Vocabulary in column order at save time
    pub actions: Vec<Action>,
    /// Rows in registration order
    pub rows: Vec<SavedRow>,
    #[serde(default)]
    pub exclusions: Vec<SavedExclusion>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent) -> Self {
        let table = agent.q_table();
        let actions: Vec<Action> = table.actions().iter().cloned().collect();

        let rows = table
            .states()
            .filter_map(|state| {
                let row = table.row(state).ok()?;
                Some(SavedRow {
                    state: state.clone(),
                    values: actions.iter().cloned().zip(row.iter().copied()).collect(),
                })
            })
            .collect();

        let mut exclusions: Vec<SavedExclusion> = agent
            .masks()
            .iter()
            .map(|(state, excluded)| SavedExclusion {
                state: state.clone(),
                actions: excluded.iter().cloned().collect(),
            })
            .collect();
        exclusions.sort_by(|a, b| a.state.cmp(&b.state));

        Self {
            version: Self::VERSION,
            actions,
            rows,
            exclusions,
        }
    }

    /// Rebuild an agent bound to `actions`.
    ///
    /// Values are matched by action name. Stored actions that are not part of
    /// `actions` are dropped; actions missing from the snapshot start at 0.
    pub fn to_agent(&self, actions: ActionSet, config: QLearningConfig) -> Result<QLearningAgent> {
        self.check_version()?;
        config.validate()?;

        let dropped: Vec<&str> = self
            .actions
            .iter()
            .filter(|action| !actions.contains(action.as_str()))
            .map(Action::as_str)
            .collect();
        if !dropped.is_empty() {
            warn!(
                actions = ?dropped,
                "stored actions are not part of the action set and were dropped"
            );
        }

        let mut q_table = QTable::new(actions.clone());
        for row in &self.rows {
            let values = actions
                .iter()
                .map(|action| row.values.get(action).copied().unwrap_or(0.0))
                .collect();
            q_table.insert_row(row.state.clone(), values);
        }

        let mut masks = ActionMaskRegistry::new();
        for entry in &self.exclusions {
            masks.set_exclusions(
                &entry.state,
                entry
                    .actions
                    .iter()
                    .filter(|action| actions.contains(action.as_str()))
                    .cloned(),
            );
        }

        Ok(QLearningAgent::from_state(AgentState {
            config,
            q_table,
            masks,
        }))
    }

    /// Action set recorded in the snapshot
    pub fn action_set(&self) -> Result<ActionSet> {
        ActionSet::new(self.actions.iter().cloned())
    }

    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    /// Gzip-compressed MessagePack encoding
    pub fn to_compressed_bytes(&self) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        rmp_serde::encode::write_named(&mut encoder, self).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize Q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        encoder.flush()?;
        encoder.finish().map_err(|source| Error::Io {
            operation: "compress Q-table".to_string(),
            source,
        })
    }

    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .map_err(|e| Error::SerializationContext {
                operation: "decompress Q-table".to_string(),
                message: e.to_string(),
            })?;

        let saved: Self =
            rmp_serde::from_slice(&decoded).map_err(|e| Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }

    fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedFormatVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }
}
