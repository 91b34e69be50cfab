//! Visibility restriction for task listings.
//!
//! A list query carries a [`TaskFilter`]: a conjunction of predicates the
//! store evaluates. [`augment_list_filter`] appends the predicate that
//! limits results to the tasks the acting actor may list. Listing is
//! stricter than [`super::rules::task::check_read`] for a global observer.

use crate::domain::{Actor, ActorId, GeoId, ProjectId, Role, Task, TaskStatus};
use std::collections::BTreeSet;

/// One condition of a task list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPredicate {
    /// The task belongs to the project.
    InProject(ProjectId),
    /// The task status is one of the given statuses.
    StatusIn(BTreeSet<TaskStatus>),
    /// The task archive flag equals the value.
    Archived(bool),
    /// The actor is the task's responsible.
    ResponsibleIs(ActorId),
    /// The task covers the geo.
    CoversGeo(GeoId),
    /// The actor created the task or participates in it.
    InvolvesActor(ActorId),
    /// No task matches.
    MatchNothing,
}

impl TaskPredicate {
    /// Evaluates the predicate against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::InProject(project_id) => task.project_id() == *project_id,
            Self::StatusIn(statuses) => statuses.contains(&task.status()),
            Self::Archived(is_archived) => task.is_archived() == *is_archived,
            Self::ResponsibleIs(actor_id) => task.responsible_actor() == Some(*actor_id),
            Self::CoversGeo(geo_id) => task.geo_ids().contains(geo_id),
            Self::InvolvesActor(actor_id) => task.involves(*actor_id),
            Self::MatchNothing => false,
        }
    }
}

/// A conjunction of [`TaskPredicate`]s. The empty filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    predicates: Vec<TaskPredicate>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate to the conjunction.
    #[must_use]
    pub fn and(mut self, predicate: TaskPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Restricts to one project.
    #[must_use]
    pub fn in_project(self, project_id: ProjectId) -> Self {
        self.and(TaskPredicate::InProject(project_id))
    }

    /// Restricts to the given statuses.
    #[must_use]
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.and(TaskPredicate::StatusIn(statuses.into_iter().collect()))
    }

    /// Restricts to active (`false`) or archived (`true`) tasks.
    #[must_use]
    pub fn archived(self, is_archived: bool) -> Self {
        self.and(TaskPredicate::Archived(is_archived))
    }

    /// Returns the predicates in the order they were added.
    #[must_use]
    pub fn predicates(&self) -> &[TaskPredicate] {
        &self.predicates
    }

    /// Returns the project the query is scoped to, if any.
    #[must_use]
    pub fn project_scope(&self) -> Option<ProjectId> {
        self.predicates.iter().find_map(|predicate| match predicate {
            TaskPredicate::InProject(project_id) => Some(*project_id),
            _ => None,
        })
    }

    /// Evaluates every predicate against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(task))
    }
}

/// Narrows a list filter to the tasks the actor may read.
///
/// * No actor, or an archived one: nothing matches.
/// * Admin or Manager globally, or Admin, Manager or Observer in
///   `project_role` for a project-scoped query: the base filter is returned
///   unchanged.
/// * Anyone else, including a global observer without a project role: only
///   tasks they created or participate in.
#[must_use]
pub fn augment_list_filter(
    base: TaskFilter,
    actor: Option<&Actor>,
    project_role: Option<Role>,
) -> TaskFilter {
    let Some(actor) = actor.filter(|actor| !actor.is_archived()) else {
        return base.and(TaskPredicate::MatchNothing);
    };
    let project_role = project_role.filter(|_| base.project_scope().is_some());
    if actor.role().is_privileged() || project_role.is_some_and(Role::can_view_all) {
        return base;
    }
    base.and(TaskPredicate::InvolvesActor(actor.id()))
}
