//! In-memory table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of TableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::warn;

use crate::{Result, ports::TableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// Stores compressed snapshots in a shared HashMap keyed by location.
///
/// # Examples
///
/// ```
/// use athene::{ActionSet, QLearningAgent, QLearningConfig};
/// use athene::adapters::InMemoryRepository;
/// use athene::ports::TableRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let actions = ActionSet::new(["donothing", "attack"])?;
/// let agent = QLearningAgent::with_defaults(actions.clone());
///
/// // Save to "memory" (not disk)
/// repo.save(&agent, Path::new("test_table"))?;
///
/// // Load from "memory"
/// let loaded = repo.load(actions, QLearningConfig::default(), Path::new("test_table"), false)?;
/// assert_eq!(loaded.state_count(), 0);
/// # Ok::<(), athene::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if a table exists at the given location.
    pub fn contains(&self, location: &Path) -> bool {
        self.storage().contains_key(&key(location))
    }

    /// Store raw bytes at a location, bypassing serialization.
    ///
    /// Useful for testing how loading copes with damaged data.
    pub fn put_bytes(&self, location: &Path, bytes: Vec<u8>) {
        self.storage().insert(key(location), bytes);
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(location: &Path) -> String {
    location.to_string_lossy().to_string()
}

impl TableRepository for InMemoryRepository {
    fn read(&self, location: &Path) -> Result<Option<SavedQTable>> {
        let storage = self.storage();
        let Some(bytes) = storage.get(&key(location)) else {
            return Ok(None);
        };

        match SavedQTable::from_compressed_bytes(bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(location = %location.display(), error = %e, "ignoring unreadable Q-table");
                Ok(None)
            }
        }
    }

    fn write(&self, snapshot: &SavedQTable, location: &Path) -> Result<()> {
        let bytes = snapshot.to_compressed_bytes()?;
        self.storage().insert(key(location), bytes);
        Ok(())
    }

    fn discard(&self, location: &Path) -> Result<()> {
        self.storage().remove(&key(location));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::{Action, ActionSet},
        config::QLearningConfig,
        q_learning::QLearningAgent,
        state::StateKey,
    };

    fn actions() -> ActionSet {
        ActionSet::new(["donothing", "attack"]).unwrap()
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let mut agent = QLearningAgent::with_defaults(actions());
        let s = StateKey::from((4,));
        agent.ensure_state(&s);
        agent.set(&s, "attack", 0.75).unwrap();

        let path = Path::new("test_table");
        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&agent, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo
            .load(actions(), QLearningConfig::default(), path, false)
            .unwrap();
        assert_eq!(loaded.get(&s, "attack").unwrap(), 0.75);
    }

    #[test]
    fn test_damaged_bytes_start_empty() {
        let repo = InMemoryRepository::new();
        let path = Path::new("damaged");
        repo.put_bytes(path, vec![0x1f, 0x8b, 0x00]);

        let agent = repo
            .load(actions(), QLearningConfig::default(), path, false)
            .unwrap();
        assert_eq!(agent.state_count(), 0);
    }

    #[test]
    fn test_reset_on_load_discards() {
        let repo = InMemoryRepository::new();
        let path = Path::new("reset");
        let mut agent = QLearningAgent::with_defaults(actions());
        agent.ensure_state(&StateKey::from((1,)));
        agent.set_exclusions(&StateKey::from((1,)), [Action::new("attack")]);
        repo.save(&agent, path).unwrap();

        let loaded = repo
            .load(actions(), QLearningConfig::default(), path, true)
            .unwrap();
        assert_eq!(loaded.state_count(), 0);
        assert!(!repo.contains(path));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1
            .save(&QLearningAgent::with_defaults(actions()), Path::new("shared"))
            .unwrap();

        assert!(repo2.contains(Path::new("shared")));
        assert_eq!(repo2.count(), 1);
    }
}
