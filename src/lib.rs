//! Tabular Q-learning value store for scripted game agents
//!
//! This crate provides:
//! - Canonical state keys built from discretized observations
//! - A sparse Q-table with lazy row creation
//! - ε-greedy action selection with per-state action masks
//! - The one-step temporal difference update with terminal handling
//! - Atomic persistence of learned tables across runs
//! - An episode score log and a small inspection CLI

pub mod actions;
pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ports;
pub mod q_learning;
pub mod score;
pub mod state;

pub use actions::{Action, ActionSet};
pub use config::QLearningConfig;
pub use error::{Error, Result};
pub use q_learning::{Episode, LearnOutcome, QLearningAgent};
pub use score::{ScoreLog, ScoreSummary};
pub use state::StateKey;
