//! Port contracts for persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the services.
//! The document store, its query builders and geospatial search live behind
//! these traits; [`crate::adapters::memory`] provides in-process versions.

pub mod repository;

pub use repository::{
    ActorRepository, GeoRepository, PageRequest, ProjectRepository, RepositoryError,
    RepositoryResult, TaskPage, TaskRepository,
};
