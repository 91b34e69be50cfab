//! Task creation, status workflow and audit history.

use super::helpers::Harness;
use geotask::access::AccessDenied;
use geotask::domain::{ActorId, Operation, OperationKind, Role, TaskStatus};
use geotask::history::{HistoryNote, Patchable, paths};
use geotask::services::{NewTask, ServiceError, TaskChanges};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn global_manager_creates_task_in_project_without_role() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let manager = harness.seed_actor("manager", Role::Manager).await?;
    let project = harness.seed_project(&[]).await?;

    let task = harness
        .tasks
        .create(manager.id(), NewTask::new(project.id(), "Sample wells"))
        .await?;
    assert_eq!(task.status(), TaskStatus::New);
    assert_eq!(task.created_by(), manager.id());
    assert!(task.history().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn responsible_actor_requests_finish_and_history_records_it() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[(worker.id(), Role::Actor)]).await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Sample wells").with_responsible_actor(worker.id()),
        )
        .await?;

    let note = HistoryNote::new().with_title("All wells sampled");
    let requested = harness
        .tasks
        .transition(worker.id(), task.id(), TaskStatus::FinishRequested, Some(note))
        .await?;
    assert_eq!(requested.status(), TaskStatus::FinishRequested);

    let history = harness.tasks.history(worker.id(), task.id()).await?;
    let [entry] = history.as_slice() else {
        eyre::bail!("expected one history entry, found {}", history.len());
    };
    assert_eq!(entry.changed_by, worker.id());
    assert_eq!(entry.title.as_deref(), Some("All wells sampled"));
    let recorded: Vec<&str> = entry
        .operations
        .iter()
        .map(|operation| operation.path.as_str())
        .collect();
    assert_eq!(recorded, vec![paths::task::STATUS, paths::task::STATUS_CHANGED_AT]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actor_cannot_finish_directly_and_nothing_is_written() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[]).await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Sample wells").with_responsible_actor(worker.id()),
        )
        .await?;

    let result = harness
        .tasks
        .transition(worker.id(), task.id(), TaskStatus::Finished, None)
        .await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::IllegalStatusTransition {
            from: TaskStatus::New,
            to: TaskStatus::Finished,
        })
    );
    assert_eq!(harness.tasks.get(worker.id(), task.id()).await?, task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actor_cannot_edit_protected_fields() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[]).await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Sample wells").with_responsible_actor(worker.id()),
        )
        .await?;

    let result = harness
        .tasks
        .update(
            worker.id(),
            task.id(),
            TaskChanges::new()
                .with_status(TaskStatus::CancelRequested)
                .with_observer_actors([ActorId::new()]),
            None,
        )
        .await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::ProtectedFieldChanged(
            paths::task::OBSERVER_ACTORS.to_owned()
        ))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_updates_fields_and_history_replays() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Actor).await?;
    let project = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;
    let first = ActorId::new();
    let second = ActorId::new();
    let third = ActorId::new();
    let task = harness
        .tasks
        .create(
            lead.id(),
            NewTask::new(project.id(), "Map channels").with_assistant_actors([first, second]),
        )
        .await?;

    let updated = harness
        .tasks
        .update(
            lead.id(),
            task.id(),
            TaskChanges::new()
                .with_title("Map side channels")
                .with_assistant_actors([second, third])
                .with_status(TaskStatus::InWork),
            None,
        )
        .await?;

    let entry = updated
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("missing history entry"))?;
    let assistant_ops: Vec<(OperationKind, Option<serde_json::Value>)> = entry
        .operations
        .iter()
        .filter(|operation| operation.path == paths::task::ASSISTANT_ACTORS)
        .map(|operation| {
            let value = operation
                .old_value
                .clone()
                .or_else(|| operation.new_value.clone());
            (operation.kind, value)
        })
        .collect();
    assert_eq!(
        assistant_ops,
        vec![
            (OperationKind::Remove, Some(serde_json::to_value(first)?)),
            (OperationKind::Add, Some(serde_json::to_value(third)?)),
        ]
    );

    let mut replayed = task.clone();
    replayed.apply_all(&entry.operations)?;
    replayed.append_history(entry.clone());
    assert_eq!(replayed, updated);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_task_needs_privilege_in_destination() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Actor).await?;
    let source = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;
    let destination = harness.seed_project(&[(lead.id(), Role::Observer)]).await?;
    let task = harness
        .tasks
        .create(lead.id(), NewTask::new(source.id(), "Relocate gauge"))
        .await?;

    let result = harness
        .tasks
        .update(
            lead.id(),
            task.id(),
            TaskChanges::new().with_project(destination.id()),
            None,
        )
        .await;
    assert_eq!(
        result.err().as_ref().and_then(ServiceError::as_denied),
        Some(&AccessDenied::ProjectObserver)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_changes_only_the_flag_and_is_recorded() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let lead = harness.seed_actor("lead", Role::Actor).await?;
    let project = harness.seed_project(&[(lead.id(), Role::Manager)]).await?;
    let task = harness
        .tasks
        .create(lead.id(), NewTask::new(project.id(), "Survey weir"))
        .await?;

    let archived = harness.tasks.archive(lead.id(), task.id()).await?;
    assert!(archived.is_archived());
    let entry = archived
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("missing history entry"))?;
    let recorded: Vec<&str> = entry
        .operations
        .iter()
        .map(|operation| operation.path.as_str())
        .collect();
    assert_eq!(recorded, vec![paths::task::IS_ARCHIVED]);

    let again = harness.tasks.archive(lead.id(), task.id()).await;
    assert!(matches!(again, Err(ServiceError::Access(_))));

    let hard = harness.tasks.delete(lead.id(), task.id()).await;
    assert!(matches!(hard, Err(ServiceError::Access(_))));
    harness.tasks.delete(harness.admin.id(), task.id()).await?;
    assert!(harness.repositories.tasks.find_by_id(task.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_participant_cannot_read_task() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let outsider = harness.seed_actor("outsider", Role::Actor).await?;
    let project = harness.seed_project(&[]).await?;
    let task = harness
        .tasks
        .create(harness.admin.id(), NewTask::new(project.id(), "Survey weir"))
        .await?;

    let result = harness.tasks.get(outsider.id(), task.id()).await;
    assert!(matches!(result, Err(ServiceError::Access(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_keeps_stored_status_timestamp_when_status_is_unchanged() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[]).await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Sample wells").with_responsible_actor(worker.id()),
        )
        .await?;

    let mut snapshot = harness.tasks.get(worker.id(), task.id()).await?;
    snapshot.apply(&Operation::replace(
        paths::task::STATUS_CHANGED_AT,
        serde_json::to_value(task.status_changed_at())?,
        serde_json::json!("1999-01-01T00:00:00Z"),
    ))?;

    let replaced = harness.tasks.replace(worker.id(), snapshot, None).await?;
    assert_eq!(replaced.status_changed_at(), task.status_changed_at());
    assert!(replaced.history().is_empty());

    let stored = harness
        .repositories
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task not stored"))?;
    assert_eq!(stored.status_changed_at(), task.status_changed_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_with_new_status_restamps_status_timestamp() -> eyre::Result<()> {
    let harness = Harness::new().await?;
    let worker = harness.seed_actor("worker", Role::Actor).await?;
    let project = harness.seed_project(&[]).await?;
    let task = harness
        .tasks
        .create(
            harness.admin.id(),
            NewTask::new(project.id(), "Sample wells").with_responsible_actor(worker.id()),
        )
        .await?;
    let forged = chrono::DateTime::parse_from_rfc3339("1999-01-01T00:00:00Z")?.to_utc();

    let mut snapshot = harness.tasks.get(worker.id(), task.id()).await?;
    snapshot.apply_all(&[
        Operation::replace(
            paths::task::STATUS,
            serde_json::to_value(TaskStatus::New)?,
            serde_json::to_value(TaskStatus::FinishRequested)?,
        ),
        Operation::replace(
            paths::task::STATUS_CHANGED_AT,
            serde_json::to_value(task.status_changed_at())?,
            serde_json::to_value(forged)?,
        ),
    ])?;

    let replaced = harness.tasks.replace(worker.id(), snapshot, None).await?;
    assert_eq!(replaced.status(), TaskStatus::FinishRequested);
    assert_ne!(replaced.status_changed_at(), forged);
    assert!(replaced.status_changed_at() >= task.status_changed_at());
    Ok(())
}
