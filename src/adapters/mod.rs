//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module.

pub mod gzip_repository;
pub mod in_memory_repository;

pub use gzip_repository::GzipRepository;
pub use in_memory_repository::InMemoryRepository;
