//! Given steps for task workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use geotask::domain::{Actor, Role};
use geotask::services::{NewProject, NewTask};
use mockable::DefaultClock;
use rstest_bdd_macros::given;

#[given(r#"a project "{title}""#)]
fn a_project(world: &mut WorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let admin = Actor::new("admin", "Administrator", Role::Admin, &DefaultClock)?;
    run_async(world.repositories.actors.store(&admin)).wrap_err("store bootstrap admin")?;
    let project = run_async(world.projects.create(admin.id(), NewProject::new(title)))
        .wrap_err("create scenario project")?;
    world.admin = Some(admin);
    world.project = Some(project);
    Ok(())
}

#[given(r#"an actor "{login}" with global role "{role}""#)]
fn an_actor(world: &mut WorkflowWorld, login: String, role: String) -> Result<(), eyre::Report> {
    let role = Role::try_from(role.as_str())?;
    let actor = Actor::new(login.as_str(), login.as_str(), role, &DefaultClock)?;
    run_async(world.repositories.actors.store(&actor)).wrap_err("store scenario actor")?;
    world.named_actors.insert(login, actor);
    Ok(())
}

#[given(r#""{login}" holds the project role "{role}""#)]
fn holds_project_role(
    world: &mut WorkflowWorld,
    login: String,
    role: String,
) -> Result<(), eyre::Report> {
    let role = Role::try_from(role.as_str())?;
    let admin_id = world.admin()?.id();
    let project_id = world.project()?.id();
    let member_id = world.actor(&login)?.id();
    let project = run_async(world.projects.assign_role(admin_id, project_id, member_id, role))
        .wrap_err("assign project role")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task "{title}" with "{login}" as responsible"#)]
fn a_task_with_responsible(
    world: &mut WorkflowWorld,
    title: String,
    login: String,
) -> Result<(), eyre::Report> {
    let admin_id = world.admin()?.id();
    let request =
        NewTask::new(world.project()?.id(), title).with_responsible_actor(world.actor(&login)?.id());
    let task = run_async(world.tasks.create(admin_id, request)).wrap_err("create scenario task")?;
    world.task = Some(task);
    Ok(())
}

#[given("{count:usize} further tasks in the project")]
fn further_tasks(world: &mut WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let admin_id = world.admin()?.id();
    let project_id = world.project()?.id();
    for index in 0..count {
        run_async(
            world
                .tasks
                .create(admin_id, NewTask::new(project_id, format!("Filler {index}"))),
        )
        .wrap_err("create filler task")?;
    }
    Ok(())
}
