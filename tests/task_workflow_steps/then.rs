//! Then steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use geotask::domain::{Task, TaskStatus};
use geotask::history::{Diffable, paths};
use geotask::services::ServiceError;
use rstest_bdd_macros::then;

fn accepted_task(world: &WorkflowWorld) -> Result<&Task, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("expected the change to be accepted: {err}"))
}

#[then("the change is accepted")]
fn change_accepted(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let task = accepted_task(world)?.clone();
    world.task = Some(task);
    Ok(())
}

#[then(r#"the change is refused with reason "{reason}""#)]
fn change_refused(world: &WorkflowWorld, reason: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing result in scenario world"))?;
    let Err(ServiceError::Access(denied)) = result else {
        return Err(eyre::eyre!("expected an access denial, got {result:?}"));
    };
    eyre::ensure!(
        denied.reasons() == vec![reason.clone()],
        "expected reason {reason:?}, got {:?}",
        denied.reasons()
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let task_id = world.task()?.id();
    let stored = run_async(world.repositories.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} not stored"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the last history entry records the status change by "{login}""#)]
fn history_records_status(world: &WorkflowWorld, login: String) -> Result<(), eyre::Report> {
    let author = world.actor(&login)?.id();
    let entry = world
        .task()?
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;
    eyre::ensure!(entry.changed_by == author, "history author mismatch");
    eyre::ensure!(
        entry
            .operations
            .iter()
            .any(|operation| operation.path == paths::task::STATUS),
        "status change missing from history"
    );
    Ok(())
}

#[then("only the archive flag changed")]
fn only_archive_flag_changed(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let before = world
        .previous_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing previous task snapshot"))?;
    let after = world.task()?;
    let changed: Vec<String> = before
        .diff(after)
        .into_iter()
        .map(|operation| operation.path)
        .collect();
    eyre::ensure!(
        changed == vec![paths::task::IS_ARCHIVED.to_owned()],
        "expected only the archive flag to change, found {changed:?}"
    );
    Ok(())
}

#[then("{count:usize} task is listed")]
fn tasks_listed(world: &WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let page = world
        .last_page
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    eyre::ensure!(
        page.total_count == count && page.items.len() == count,
        "expected {count} listed tasks, found {}",
        page.total_count
    );
    Ok(())
}
