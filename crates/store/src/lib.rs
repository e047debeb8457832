//! Persistence layer for projects, categories and expenses.
//!
//! This crate provides:
//! - The [`ProjectRepository`] port the rest of the application codes against
//! - [`InMemoryRepository`], an implementation with cascade deletes
//! - [`Snapshot`] import/export of whole project trees as JSON

pub mod error;
pub mod memory;
pub mod repository;
pub mod snapshot;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRepository;
pub use repository::ProjectRepository;
pub use snapshot::Snapshot;
