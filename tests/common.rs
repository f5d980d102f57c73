//! Common test utilities for the athene test suite.

#![allow(dead_code)]

use athene::{ActionSet, QLearningAgent, QLearningConfig};

/// Action vocabulary of the minerals-and-gas scenario.
pub const HARVEST_ACTIONS: [&str; 7] = [
    "donothing",
    "select_idle_worker",
    "harvestminerals",
    "selectcc",
    "trainscv",
    "buildsupply",
    "buildrefinery",
];

pub fn harvest_actions() -> ActionSet {
    ActionSet::new(HARVEST_ACTIONS).expect("valid action set")
}

/// Agent with the given hyperparameters and a fixed seed.
pub fn seeded_agent(alpha: f64, gamma: f64, epsilon: f64, seed: u64) -> QLearningAgent {
    QLearningAgent::new(
        harvest_actions(),
        QLearningConfig::new(alpha, gamma, epsilon).with_seed(seed),
    )
    .expect("valid configuration")
}
