//! Reference cleanup after an approved hard delete.
//!
//! Each function runs once the entity itself is gone. Task edits made here
//! are recorded in the task history as authored by the deleting actor.
//!
//! * Actor removed: dropped from every project role map and every task
//!   participant slot.
//! * Geo removed: dropped from its project's layers and every task's geos.
//! * Project removed: its tasks and geos are removed with it, and its geos
//!   are dropped from tasks of other projects.

use super::{Repositories, ServiceResult};
use crate::domain::{ActorId, Geo, ProjectId, Task};
use crate::history::AuditRecorder;
use mockable::Clock;

/// Counts of the records a reconciliation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Projects rewritten.
    pub projects_updated: usize,
    /// Tasks rewritten.
    pub tasks_updated: usize,
    /// Tasks removed.
    pub tasks_deleted: usize,
    /// Geos removed.
    pub geos_deleted: usize,
}

/// Scrubs a removed actor from projects and tasks.
///
/// # Errors
///
/// Returns repository or history errors; records already rewritten stay
/// rewritten.
pub async fn actor_removed(
    repositories: &Repositories,
    recorder: &AuditRecorder,
    clock: &(impl Clock + Sync),
    author: ActorId,
    actor_id: ActorId,
) -> ServiceResult<Reconciliation> {
    let mut summary = Reconciliation::default();

    for mut project in repositories.projects.list().await? {
        if project.remove_member(actor_id) {
            repositories.projects.update(&project).await?;
            summary.projects_updated += 1;
        }
    }

    for stored in repositories.tasks.find_referencing_actor(actor_id).await? {
        let mut scrubbed = stored.clone();
        if scrubbed.scrub_actor(actor_id) {
            rewrite_task(repositories, recorder, clock, author, &stored, scrubbed).await?;
            summary.tasks_updated += 1;
        }
    }
    Ok(summary)
}

/// Scrubs a removed geo from its project's layers and from tasks.
///
/// # Errors
///
/// Returns repository or history errors.
pub async fn geo_removed(
    repositories: &Repositories,
    recorder: &AuditRecorder,
    clock: &(impl Clock + Sync),
    author: ActorId,
    geo: &Geo,
) -> ServiceResult<Reconciliation> {
    let mut summary = Reconciliation::default();

    if let Some(mut project) = repositories.projects.find_by_id(geo.project_id()).await? {
        if project.remove_layer(geo.id()) {
            repositories.projects.update(&project).await?;
            summary.projects_updated += 1;
        }
    }

    for stored in repositories.tasks.find_referencing_geo(geo.id()).await? {
        let mut scrubbed = stored.clone();
        if scrubbed.scrub_geo(geo.id()) {
            rewrite_task(repositories, recorder, clock, author, &stored, scrubbed).await?;
            summary.tasks_updated += 1;
        }
    }
    Ok(summary)
}

/// Removes the tasks and geos of a removed project.
///
/// Tasks in other projects that cover one of its geos are rewritten
/// without it.
///
/// # Errors
///
/// Returns repository or history errors.
pub async fn project_removed(
    repositories: &Repositories,
    recorder: &AuditRecorder,
    clock: &(impl Clock + Sync),
    author: ActorId,
    project_id: ProjectId,
) -> ServiceResult<Reconciliation> {
    let mut summary = Reconciliation::default();

    for task in repositories.tasks.find_by_project(project_id).await? {
        repositories.tasks.delete(task.id()).await?;
        summary.tasks_deleted += 1;
    }
    for geo in repositories.geos.find_by_project(project_id).await? {
        repositories.geos.delete(geo.id()).await?;
        summary.geos_deleted += 1;
        for stored in repositories.tasks.find_referencing_geo(geo.id()).await? {
            let mut scrubbed = stored.clone();
            if scrubbed.scrub_geo(geo.id()) {
                rewrite_task(repositories, recorder, clock, author, &stored, scrubbed).await?;
                summary.tasks_updated += 1;
            }
        }
    }
    Ok(summary)
}

async fn rewrite_task(
    repositories: &Repositories,
    recorder: &AuditRecorder,
    clock: &(impl Clock + Sync),
    author: ActorId,
    stored: &Task,
    mut scrubbed: Task,
) -> ServiceResult<()> {
    if let Some(entry) = recorder.record(stored, &scrubbed, author, None, clock)? {
        scrubbed.append_history(entry);
    }
    repositories.tasks.update(&scrubbed).await?;
    Ok(())
}
