//! Repository ports for actors, projects, geos and tasks.

use crate::access::{EntityKind, TaskFilter};
use crate::domain::{Actor, ActorId, Geo, GeoId, Project, ProjectId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Actor persistence contract.
#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Stores a new actor.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the identifier exists or
    /// [`RepositoryError::DuplicateLogin`] when the login is taken.
    async fn store(&self, actor: &Actor) -> RepositoryResult<()>;

    /// Persists changes to an existing actor.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the actor does not exist.
    async fn update(&self, actor: &Actor) -> RepositoryResult<()>;

    /// Removes an actor.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the actor does not exist.
    async fn delete(&self, id: ActorId) -> RepositoryResult<()>;

    /// Finds an actor by identifier.
    async fn find_by_id(&self, id: ActorId) -> RepositoryResult<Option<Actor>>;

    /// Finds an actor by login.
    async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<Actor>>;

    /// Returns every actor, ordered by login.
    async fn list(&self) -> RepositoryResult<Vec<Actor>>;
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the identifier exists.
    async fn store(&self, project: &Project) -> RepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not exist.
    async fn update(&self, project: &Project) -> RepositoryResult<()>;

    /// Removes a project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not exist.
    async fn delete(&self, id: ProjectId) -> RepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;

    /// Returns every project, ordered by creation time.
    async fn list(&self) -> RepositoryResult<Vec<Project>>;
}

/// Geo persistence contract.
#[async_trait]
pub trait GeoRepository: Send + Sync {
    /// Stores a new geo.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the identifier exists.
    async fn store(&self, geo: &Geo) -> RepositoryResult<()>;

    /// Persists changes to an existing geo.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the geo does not exist.
    async fn update(&self, geo: &Geo) -> RepositoryResult<()>;

    /// Removes a geo.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the geo does not exist.
    async fn delete(&self, id: GeoId) -> RepositoryResult<()>;

    /// Finds a geo by identifier.
    async fn find_by_id(&self, id: GeoId) -> RepositoryResult<Option<Geo>>;

    /// Returns the geos of a project, ordered by creation time.
    async fn find_by_project(&self, project_id: ProjectId) -> RepositoryResult<Vec<Geo>>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the identifier exists.
    async fn store(&self, task: &Task) -> RepositoryResult<()>;

    /// Persists changes to an existing task, history included.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> RepositoryResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> RepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Returns one page of the tasks matching the filter, ordered by
    /// creation time, together with the total number of matches.
    async fn find_by_filter(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> RepositoryResult<TaskPage>;

    /// Returns every task of a project.
    async fn find_by_project(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>>;

    /// Returns every task in which the actor is responsible, assistant or
    /// observer.
    async fn find_referencing_actor(&self, actor_id: ActorId) -> RepositoryResult<Vec<Task>>;

    /// Returns every task covering the geo.
    async fn find_referencing_geo(&self, geo_id: GeoId) -> RepositoryResult<Vec<Task>>;
}

/// Offset pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Number of matches to skip.
    pub offset: usize,
    /// Maximum number of items to return; `None` returns the rest.
    pub limit: Option<usize>,
}

impl PageRequest {
    /// Requests every match.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// Requests up to `limit` matches after skipping `offset`.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

/// One page of a task list query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPage {
    /// The tasks on this page.
    pub items: Vec<Task>,
    /// Number of matches across all pages.
    pub total_count: usize,
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// An entity with the same identifier already exists.
    #[error("duplicate {entity} identifier: {id}")]
    Duplicate {
        /// The entity kind.
        entity: EntityKind,
        /// The conflicting identifier.
        id: String,
    },

    /// Another actor already holds the login.
    #[error("duplicate actor login: {0}")]
    DuplicateLogin(String),

    /// The entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind.
        entity: EntityKind,
        /// The missing identifier.
        id: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Creates a duplicate-identifier error.
    #[must_use]
    pub fn duplicate(entity: EntityKind, id: impl ToString) -> Self {
        Self::Duplicate {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
