//! When steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use geotask::access::TaskFilter;
use geotask::domain::TaskStatus;
use geotask::ports::PageRequest;
use geotask::services::NewTask;
use rstest_bdd_macros::when;

#[when(r#""{login}" moves the task to "{status}""#)]
fn moves_task(world: &mut WorkflowWorld, login: String, status: String) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(status.as_str())?;
    let actor_id = world.actor(&login)?.id();
    let task_id = world.task()?.id();
    world.previous_task = world.task.clone();
    world.last_result = Some(run_async(
        world.tasks.transition(actor_id, task_id, status, None),
    ));
    Ok(())
}

#[when(r#""{login}" creates a task "{title}""#)]
fn creates_task(world: &mut WorkflowWorld, login: String, title: String) -> Result<(), eyre::Report> {
    let actor_id = world.actor(&login)?.id();
    let request = NewTask::new(world.project()?.id(), title);
    world.last_result = Some(run_async(world.tasks.create(actor_id, request)));
    Ok(())
}

#[when(r#""{login}" archives the task"#)]
fn archives_task(world: &mut WorkflowWorld, login: String) -> Result<(), eyre::Report> {
    let actor_id = world.actor(&login)?.id();
    let task_id = world.task()?.id();
    world.previous_task = world.task.clone();
    world.last_result = Some(run_async(world.tasks.archive(actor_id, task_id)));
    Ok(())
}

#[when(r#""{login}" lists the project's tasks"#)]
fn lists_tasks(world: &mut WorkflowWorld, login: String) -> Result<(), eyre::Report> {
    let actor_id = world.actor(&login)?.id();
    let filter = TaskFilter::new().in_project(world.project()?.id());
    let page = run_async(world.tasks.list(actor_id, filter, PageRequest::all()))?;
    world.last_page = Some(page);
    Ok(())
}
