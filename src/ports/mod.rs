//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the learning core and implemented by adapters
//! in the infrastructure layer.

pub mod repository;

pub use repository::TableRepository;
