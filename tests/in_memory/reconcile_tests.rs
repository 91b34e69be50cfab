//! Reference cleanup after hard deletes.

use super::helpers::Harness;
use geotask::domain::Role;
use geotask::history::paths;
use geotask::services::{NewGeo, NewTask, Reconciliation};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_actor_scrubs_roles_and_participation() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[(worker.id(), Role::Actor)]).await?;
    let responsible = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Gauge readings").with_responsible_actor(worker.id()),
        )
        .await?;
    let assisted = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Gauge repairs").with_assistant_actors([worker.id()]),
        )
        .await?;

    let summary = harness.actors.delete(harness.admin.id(), worker.id()).await?;
    assert_eq!(
        summary,
        Reconciliation {
            projects_updated: 1,
            tasks_updated: 2,
            ..Reconciliation::default()
        }
    );

    let stored = harness.projects.get(harness.admin.id(), project.id()).await?;
    assert_eq!(stored.role_of(worker.id()), None);

    let scrubbed = harness.tasks.get(harness.admin.id(), responsible.id()).await?;
    assert_eq!(scrubbed.responsible_actor(), None);
    let entry = scrubbed
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("missing history entry"))?;
    assert_eq!(entry.changed_by, harness.admin.id());
    assert_eq!(
        entry.operations.first().map(|operation| operation.path.as_str()),
        Some(paths::task::RESPONSIBLE_ACTOR)
    );

    let scrubbed = harness.tasks.get(harness.admin.id(), assisted.id()).await?;
    assert!(scrubbed.assistant_actors().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_geo_scrubs_layers_and_tasks() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let geo = harness
        .geos
        .create(harness.admin.id(), NewGeo::new(project.id(), "Estuary mouth"))
        .await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Salinity profile").with_geo_ids([geo.id()]),
        )
        .await?;

    let summary = harness.geos.delete(harness.admin.id(), geo.id()).await?;
    assert_eq!(summary.projects_updated, 1);
    assert_eq!(summary.tasks_updated, 1);

    let stored = harness.projects.get(harness.admin.id(), project.id()).await?;
    assert!(stored.layers().is_empty());
    let scrubbed = harness.tasks.get(harness.admin.id(), task.id()).await?;
    assert!(scrubbed.geo_ids().is_empty());
    assert_eq!(scrubbed.history().len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_project_removes_its_tasks_and_geos() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let survivor = harness.seed_project(&[]).await?;
    harness
        .geos
        .create(harness.admin.id(), NewGeo::new(project.id(), "Channel"))
        .await?;
    for title in ["Depth soundings", "Flow gauging"] {
        harness
            .tasks
            .create(harness.admin.id(), NewTask::new(project.id(), title))
            .await?;
    }
    let kept = harness
        .tasks
        .create(harness.admin.id(), NewTask::new(survivor.id(), "Baseline"))
        .await?;

    let summary = harness.projects.delete(harness.admin.id(), project.id()).await?;
    assert_eq!(summary.tasks_deleted, 2);
    assert_eq!(summary.geos_deleted, 1);
    assert!(
        harness
            .repositories
            .tasks
            .find_by_project(project.id())
            .await?
            .is_empty()
    );
    assert!(harness.repositories.tasks.find_by_id(kept.id()).await?.is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_project_scrubs_its_geos_from_other_projects_tasks() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let doomed = harness.seed_project(&[]).await?;
    let other = harness.seed_project(&[]).await?;
    let geo = harness
        .geos
        .create(harness.admin.id(), NewGeo::new(doomed.id(), "Tidal inlet"))
        .await?;
    let borrowing = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(other.id(), "Inlet survey").with_geo_ids([geo.id()]),
        )
        .await?;

    let summary = harness.projects.delete(harness.admin.id(), doomed.id()).await?;
    assert_eq!(summary.geos_deleted, 1);
    assert_eq!(summary.tasks_updated, 1);

    let stored = harness
        .repositories
        .tasks
        .find_by_id(borrowing.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task in surviving project was removed"))?;
    assert!(stored.geo_ids().is_empty());
    let entry = stored
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("missing history entry"))?;
    assert_eq!(entry.changed_by, harness.admin.id());
    assert_eq!(
        entry.operations.first().map(|operation| operation.path.as_str()),
        Some(paths::task::GEO_IDS)
    );
    Ok(())
}
