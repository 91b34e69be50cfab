//! Unit tests for role resolution, rules and list narrowing.


use crate::domain::{Actor, ActorId, Project, Role, Task};
use mockable::DefaultClock;

/// Builds an active actor with the given global role.
pub(super) fn actor(login: &str, role: Role) -> Actor {
    Actor::new(login, login, role, &DefaultClock).expect("valid actor")
}

/// Builds a project in which `member` holds `role`, when given.
pub(super) fn project_with(member: Option<(ActorId, Role)>) -> Project {
    let project = Project::new("Delta mapping", &DefaultClock).expect("valid project");
    match member {
        Some((actor_id, role)) => project.with_member(actor_id, role),
        None => project,
    }
}

/// Builds a task in the project with a single responsible actor.
pub(super) fn task_in(project: &Project, responsible: ActorId) -> Task {
    Task::builder(project.id(), "Inspect levee", ActorId::new())
        .with_responsible_actor(responsible)
        .build(&DefaultClock)
        .expect("valid task")
}
