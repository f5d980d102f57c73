//! Tabular Q-learning
//!
//! This module implements the value store used by scripted agents: a sparse
//! table of per-action value estimates keyed by discretized states, an
//! ε-greedy policy with per-state action masks, and the one-step temporal
//! difference update.
//!
//! ## Update rule
//!
//! | Next state | Target |
//! |------------|--------|
//! | same as previous | no update |
//! | terminal | `r` |
//! | otherwise | `r + γ · max_{a' ∉ mask(s')} Q(s',a')` |
//!
//! followed by `Q(s,a) ← Q(s,a) + α (target − Q(s,a))`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use athene::{
//!     ActionSet, QLearningConfig, StateKey,
//!     adapters::GzipRepository,
//!     ports::TableRepository,
//!     q_learning::Episode,
//! };
//! use std::path::Path;
//!
//! let repo = GzipRepository::new();
//! let location = Path::new("memory/collect_minerals_and_gas");
//! let actions = ActionSet::new(["donothing", "selectidle", "trainscv"])?;
//! let mut agent = repo.load(actions, QLearningConfig::default(), location, false)?;
//!
//! let mut episode = Episode::new();
//! let action = episode.step(&mut agent, StateKey::from((0, 12, 0, 0)), None)?;
//! // ... execute `action` in the game, observe the next state ...
//! episode.finish_and_save(&mut agent, 1.0, &repo, location)?;
//! # Ok::<(), athene::Error>(())
//! ```

pub mod agent;
pub mod episode;
pub mod learning;
pub mod masks;
pub mod policy;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use episode::Episode;
pub use learning::{LearnOutcome, TdUpdate};
pub use masks::ActionMaskRegistry;
pub use policy::{EpsilonGreedy, SelectionMode};
pub use q_table::QTable;
pub use serialization::{SavedExclusion, SavedQTable, SavedRow};
