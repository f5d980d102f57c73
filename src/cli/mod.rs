//! CLI infrastructure for inspecting and maintaining stored Q-tables

pub mod commands;
pub mod output;
