//! Thread-safe in-memory repositories.
//!
//! Every repository keeps its state behind `Arc<RwLock<_>>`; clones share
//! the same store. They back the integration tests and suit embedding
//! processes that need no durable storage.

mod actor;
mod geo;
mod project;
mod task;

pub use actor::InMemoryActorRepository;
pub use geo::InMemoryGeoRepository;
pub use project::InMemoryProjectRepository;
pub use task::InMemoryTaskRepository;

use crate::ports::RepositoryError;

/// Maps a poisoned lock into a persistence error.
fn poisoned(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::persistence(std::io::Error::other(err.to_string()))
}
