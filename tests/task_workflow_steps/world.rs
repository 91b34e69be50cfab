//! Shared world state for task workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use geotask::domain::{Actor, Project, Task};
use geotask::ports::TaskPage;
use geotask::services::{ProjectService, Repositories, ServiceError, TaskService};
use mockable::DefaultClock;
use rstest::fixture;

/// Scenario world for task workflow behaviour tests.
pub struct WorkflowWorld {
    pub repositories: Repositories,
    pub projects: ProjectService<DefaultClock>,
    pub tasks: TaskService<DefaultClock>,
    pub admin: Option<Actor>,
    pub project: Option<Project>,
    pub named_actors: HashMap<String, Actor>,
    pub task: Option<Task>,
    pub previous_task: Option<Task>,
    pub last_result: Option<Result<Task, ServiceError>>,
    pub last_page: Option<TaskPage>,
}

impl WorkflowWorld {
    /// Creates a world with empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let repositories = Repositories::in_memory();
        let clock = Arc::new(DefaultClock);
        Self {
            projects: ProjectService::new(repositories.clone(), Arc::clone(&clock)),
            tasks: TaskService::new(repositories.clone(), clock),
            repositories,
            admin: None,
            project: None,
            named_actors: HashMap::new(),
            task: None,
            previous_task: None,
            last_result: None,
            last_page: None,
        }
    }

    /// Returns the bootstrap admin.
    pub fn admin(&self) -> eyre::Result<&Actor> {
        self.admin
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing admin in scenario world"))
    }

    /// Returns the scenario project.
    pub fn project(&self) -> eyre::Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns a named actor.
    pub fn actor(&self, login: &str) -> eyre::Result<&Actor> {
        self.named_actors
            .get(login)
            .ok_or_else(|| eyre::eyre!("unknown actor {login} in scenario world"))
    }

    /// Returns the current task.
    pub fn task(&self) -> eyre::Result<&Task> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
