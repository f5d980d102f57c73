//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage layer. A location identifies one stored table; what it maps to
//! (a directory, a key in memory) is up to the adapter.

use std::path::Path;

use tracing::info;

use crate::{
    Result,
    actions::ActionSet,
    config::QLearningConfig,
    q_learning::{QLearningAgent, SavedQTable},
};

/// Port for persisting and loading Q-learning tables.
///
/// Adapters provide the raw snapshot operations; [`TableRepository::load`]
/// and [`TableRepository::save`] build the agent-level contract on top.
///
/// # Examples
///
/// ```no_run
/// use athene::{ActionSet, QLearningConfig, adapters::GzipRepository, ports::TableRepository};
/// use std::path::Path;
///
/// let repo = GzipRepository::new();
/// let actions = ActionSet::new(["donothing", "trainscv"])?;
/// let agent = repo.load(actions, QLearningConfig::default(), Path::new("memory"), false)?;
/// repo.save(&agent, Path::new("memory"))?;
/// # Ok::<(), athene::Error>(())
/// ```
pub trait TableRepository {
    /// Read the snapshot stored at `location`.
    ///
    /// Returns `Ok(None)` when nothing usable is stored there: a missing or
    /// corrupted store means "start empty".
    ///
    /// # Errors
    ///
    /// Returns an error for storage failures other than absence, such as
    /// missing permissions.
    fn read(&self, location: &Path) -> Result<Option<SavedQTable>>;

    /// Write a snapshot to `location`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the store cannot be written.
    /// A failed write must leave previously stored data intact.
    fn write(&self, snapshot: &SavedQTable, location: &Path) -> Result<()>;

    /// Remove whatever is stored at `location`. Removing nothing succeeds.
    fn discard(&self, location: &Path) -> Result<()>;

    /// Load an agent bound to `actions` from `location`.
    ///
    /// With `reset`, the stored table is discarded first and the agent starts
    /// empty.
    fn load(
        &self,
        actions: ActionSet,
        config: QLearningConfig,
        location: &Path,
        reset: bool,
    ) -> Result<QLearningAgent> {
        config.validate()?;
        if reset {
            info!(location = %location.display(), "discarding stored Q-table");
            self.discard(location)?;
        }

        match self.read(location)? {
            Some(snapshot) => {
                let agent = snapshot.to_agent(actions, config)?;
                info!(
                    location = %location.display(),
                    states = agent.state_count(),
                    "loaded Q-table"
                );
                Ok(agent)
            }
            None => {
                info!(location = %location.display(), "starting with an empty Q-table");
                QLearningAgent::new(actions, config)
            }
        }
    }

    /// Persist the agent's table and masks at `location`.
    fn save(&self, agent: &QLearningAgent, location: &Path) -> Result<()> {
        self.write(&SavedQTable::from_agent(agent), location)?;
        info!(
            location = %location.display(),
            states = agent.state_count(),
            "saved Q-table"
        );
        Ok(())
    }
}
