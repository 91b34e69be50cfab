//! The set of repositories a service works against.

use crate::adapters::memory::{
    InMemoryActorRepository, InMemoryGeoRepository, InMemoryProjectRepository,
    InMemoryTaskRepository,
};
use crate::ports::{ActorRepository, GeoRepository, ProjectRepository, TaskRepository};
use std::sync::Arc;

/// Shared handles to every repository port.
///
/// Cloning is cheap; clones point at the same stores.
#[derive(Clone)]
pub struct Repositories {
    /// Actor store.
    pub actors: Arc<dyn ActorRepository>,
    /// Project store.
    pub projects: Arc<dyn ProjectRepository>,
    /// Geo store.
    pub geos: Arc<dyn GeoRepository>,
    /// Task store.
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Bundles the given repositories.
    #[must_use]
    pub fn new(
        actors: Arc<dyn ActorRepository>,
        projects: Arc<dyn ProjectRepository>,
        geos: Arc<dyn GeoRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            actors,
            projects,
            geos,
            tasks,
        }
    }

    /// Creates a fresh set of in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryActorRepository::new()),
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryGeoRepository::new()),
            Arc::new(InMemoryTaskRepository::new()),
        )
    }

    /// Returns a copy with the task store replaced.
    #[must_use]
    pub fn with_tasks(mut self, tasks: Arc<dyn TaskRepository>) -> Self {
        self.tasks = tasks;
        self
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
