//! Visibility of task listings.

use super::helpers::Harness;
use geotask::access::TaskFilter;
use geotask::domain::{ActorId, Role, TaskStatus};
use geotask::ports::PageRequest;
use geotask::services::{NewTask, TaskChanges};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn global_observer_without_project_role_sees_only_participation() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let observer = harness.seed_actor("watcher", Role::Observer).await?;
    let project = harness.seed_project(&[]).await?;
    let mut watched = Vec::new();
    for (index, observed) in [true, false, true, false].into_iter().enumerate() {
        let request = NewTask::new(project.id(), format!("Transect {index}"));
        let request = if observed {
            request.with_observer_actors([observer.id()])
        } else {
            request.with_responsible_actor(ActorId::new())
        };
        let task = harness.tasks.create(harness.admin.id(), request).await?;
        if observed {
            watched.push(task.id());
        }
    }

    let base = TaskFilter::new().in_project(project.id());
    let everything = harness
        .tasks
        .list(harness.admin.id(), base.clone(), PageRequest::all())
        .await?;
    assert_eq!(everything.total_count, 4);

    let narrowed = harness
        .tasks
        .list(observer.id(), base, PageRequest::all())
        .await?;
    assert_eq!(narrowed.total_count, 2);
    let seen: Vec<_> = narrowed.items.iter().map(|task| task.id()).collect();
    assert_eq!(seen, watched);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_observer_sees_every_project_task() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let auditor = harness.seed_actor("auditor", Role::Actor).await?;
    let project = harness.seed_project(&[(auditor.id(), Role::Observer)]).await?;
    for index in 0..3 {
        harness
            .tasks
            .create(
                harness.admin.id(),
                NewTask::new(project.id(), format!("Core {index}")),
            )
            .await?;
    }

    let scoped = harness
        .tasks
        .list(
            auditor.id(),
            TaskFilter::new().in_project(project.id()),
            PageRequest::all(),
        )
        .await?;
    assert_eq!(scoped.total_count, 3);

    let unscoped = harness
        .tasks
        .list(auditor.id(), TaskFilter::new(), PageRequest::all())
        .await?;
    assert_eq!(unscoped.total_count, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paging_reports_total_and_respects_status_filter() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let mut created = Vec::new();
    for index in 0..5 {
        let task = harness
            .tasks
            .create(
                harness.admin.id(),
                NewTask::new(project.id(), format!("Plot {index}")),
            )
            .await?;
        created.push(task);
    }
    let started = created
        .first()
        .ok_or_else(|| eyre::eyre!("no tasks created"))?;
    harness
        .tasks
        .update(
            harness.admin.id(),
            started.id(),
            TaskChanges::new().with_status(TaskStatus::InWork),
            None,
        )
        .await?;

    let page = harness
        .tasks
        .list(
            harness.admin.id(),
            TaskFilter::new()
                .in_project(project.id())
                .with_statuses([TaskStatus::New]),
            PageRequest::new(1, 2),
        )
        .await?;
    assert_eq!(page.total_count, 4);
    assert_eq!(page.items.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_actor_gets_empty_listing() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let project = harness.seed_project(&[]).await?;
    let worker = harness.seed_actor("worker", Role::Manager).await?;
    harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Plot").with_responsible_actor(worker.id()),
        )
        .await?;
    harness.actors.archive(harness.admin.id(), worker.id()).await?;

    let page = harness
        .tasks
        .list(worker.id(), TaskFilter::new(), PageRequest::all())
        .await?;
    assert_eq!(page.total_count, 0);
    assert!(page.items.is_empty());
    Ok(())
}
