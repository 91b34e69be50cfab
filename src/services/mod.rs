//! Application services for actors, projects, geos and tasks.
//!
//! Every operation follows the same sequence: load the acting actor and
//! the affected snapshots through the ports, resolve project roles, ask the
//! [`PermissionEvaluator`](crate::access::PermissionEvaluator) for
//! approval, build history for task changes, and only then write.
//! Hard deletes finish with the explicit steps in [`reconcile`].

mod actor;
mod error;
mod geo;
mod project;
pub mod reconcile;
mod repositories;
mod task;

pub use actor::{ActorChanges, ActorService, NewActor};
pub use error::{ServiceError, ServiceResult};
pub use geo::{GeoChanges, GeoService, NewGeo};
pub use project::{NewProject, ProjectChanges, ProjectService};
pub use reconcile::Reconciliation;
pub use repositories::Repositories;
pub use task::{NewTask, TaskChanges, TaskService};

use crate::access::{AccessResult, Action, EntityKind};
use crate::domain::{Actor, ActorId, Project, ProjectId};

/// Logs the outcome of an access check and converts a denial.
fn authorize(
    result: AccessResult,
    acting: ActorId,
    entity: EntityKind,
    action: Action,
) -> ServiceResult<()> {
    match result {
        Ok(()) => {
            tracing::debug!(actor_id = %acting, %entity, %action, "access granted");
            Ok(())
        }
        Err(denied) => {
            tracing::warn!(
                actor_id = %acting,
                %entity,
                %action,
                reasons = ?denied.reasons(),
                "access denied"
            );
            Err(ServiceError::Access(denied))
        }
    }
}

/// Loads the acting actor; a missing one is left for the evaluator to deny.
async fn load_acting(repositories: &Repositories, acting: ActorId) -> ServiceResult<Option<Actor>> {
    Ok(repositories.actors.find_by_id(acting).await?)
}

/// Loads a project that must exist.
async fn require_project(
    repositories: &Repositories,
    project_id: ProjectId,
) -> ServiceResult<Project> {
    repositories
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Project, project_id))
}
