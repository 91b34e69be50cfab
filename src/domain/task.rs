//! Task aggregate root.

use super::{ActorId, DomainError, GeoId, HistoryEntry, ProjectId, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A unit of collaborative work inside a project.
///
/// Field order is significant: audit diffs visit fields in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    status_changed_at: DateTime<Utc>,
    created_by: ActorId,
    created_at: DateTime<Utc>,
    responsible_actor: Option<ActorId>,
    assistant_actors: BTreeSet<ActorId>,
    observer_actors: BTreeSet<ActorId>,
    geo_ids: BTreeSet<GeoId>,
    planned_start_at: Option<DateTime<Utc>>,
    planned_finish_at: Option<DateTime<Utc>>,
    is_archived: bool,
    history: Vec<HistoryEntry>,
}

/// Builder for new tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBuilder {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    created_by: ActorId,
    responsible_actor: Option<ActorId>,
    assistant_actors: BTreeSet<ActorId>,
    observer_actors: BTreeSet<ActorId>,
    geo_ids: BTreeSet<GeoId>,
    planned_start_at: Option<DateTime<Utc>>,
    planned_finish_at: Option<DateTime<Utc>>,
}

impl TaskBuilder {
    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the responsible actor.
    #[must_use]
    pub const fn with_responsible_actor(mut self, actor_id: ActorId) -> Self {
        self.responsible_actor = Some(actor_id);
        self
    }

    /// Sets the assistant actors.
    #[must_use]
    pub fn with_assistant_actors(mut self, actors: impl IntoIterator<Item = ActorId>) -> Self {
        self.assistant_actors = actors.into_iter().collect();
        self
    }

    /// Sets the observer actors.
    #[must_use]
    pub fn with_observer_actors(mut self, actors: impl IntoIterator<Item = ActorId>) -> Self {
        self.observer_actors = actors.into_iter().collect();
        self
    }

    /// Sets the geos the task covers.
    #[must_use]
    pub fn with_geo_ids(mut self, geo_ids: impl IntoIterator<Item = GeoId>) -> Self {
        self.geo_ids = geo_ids.into_iter().collect();
        self
    }

    /// Sets the planned schedule.
    #[must_use]
    pub const fn with_schedule(
        mut self,
        planned_start_at: Option<DateTime<Utc>>,
        planned_finish_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.planned_start_at = planned_start_at;
        self.planned_finish_at = planned_finish_at;
        self
    }

    /// Builds a task in [`TaskStatus::New`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the title is blank or
    /// [`DomainError::InvalidSchedule`] when the planned finish precedes the
    /// planned start.
    pub fn build(self, clock: &impl Clock) -> Result<Task, DomainError> {
        let title = normalize_title(self.title)?;
        validate_schedule(self.planned_start_at, self.planned_finish_at)?;
        let timestamp = clock.utc();

        Ok(Task {
            id: TaskId::new(),
            project_id: self.project_id,
            title,
            description: self.description,
            status: TaskStatus::New,
            status_changed_at: timestamp,
            created_by: self.created_by,
            created_at: timestamp,
            responsible_actor: self.responsible_actor,
            assistant_actors: self.assistant_actors,
            observer_actors: self.observer_actors,
            geo_ids: self.geo_ids,
            planned_start_at: self.planned_start_at,
            planned_finish_at: self.planned_finish_at,
            is_archived: false,
            history: Vec::new(),
        })
    }
}

impl Task {
    /// Starts building a new task.
    #[must_use]
    pub fn builder(
        project_id: ProjectId,
        title: impl Into<String>,
        created_by: ActorId,
    ) -> TaskBuilder {
        TaskBuilder {
            project_id,
            title: title.into(),
            description: None,
            created_by,
            responsible_actor: None,
            assistant_actors: BTreeSet::new(),
            observer_actors: BTreeSet::new(),
            geo_ids: BTreeSet::new(),
            planned_start_at: None,
            planned_finish_at: None,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the status last changed value.
    #[must_use]
    pub const fn status_changed_at(&self) -> DateTime<Utc> {
        self.status_changed_at
    }

    /// Returns the creating actor.
    #[must_use]
    pub const fn created_by(&self) -> ActorId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the responsible actor, if any.
    #[must_use]
    pub const fn responsible_actor(&self) -> Option<ActorId> {
        self.responsible_actor
    }

    /// Returns the assistant actors.
    #[must_use]
    pub const fn assistant_actors(&self) -> &BTreeSet<ActorId> {
        &self.assistant_actors
    }

    /// Returns the observer actors.
    #[must_use]
    pub const fn observer_actors(&self) -> &BTreeSet<ActorId> {
        &self.observer_actors
    }

    /// Returns the geos covered by the task.
    #[must_use]
    pub const fn geo_ids(&self) -> &BTreeSet<GeoId> {
        &self.geo_ids
    }

    /// Returns the planned start.
    #[must_use]
    pub const fn planned_start_at(&self) -> Option<DateTime<Utc>> {
        self.planned_start_at
    }

    /// Returns the planned finish.
    #[must_use]
    pub const fn planned_finish_at(&self) -> Option<DateTime<Utc>> {
        self.planned_finish_at
    }

    /// Returns `true` when the task has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the audit history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns `true` when the actor is the responsible, an assistant or an
    /// observer of this task.
    #[must_use]
    pub fn is_participant(&self, actor_id: ActorId) -> bool {
        self.responsible_actor == Some(actor_id)
            || self.assistant_actors.contains(&actor_id)
            || self.observer_actors.contains(&actor_id)
    }

    /// Returns `true` when the actor participates in the task or created it.
    #[must_use]
    pub fn involves(&self, actor_id: ActorId) -> bool {
        self.created_by == actor_id || self.is_participant(actor_id)
    }

    /// Moves the task to another project.
    pub const fn set_project(&mut self, project_id: ProjectId) {
        self.project_id = project_id;
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the title is blank.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        self.title = normalize_title(title.into())?;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Sets the status, stamping `status_changed_at` only when the value
    /// actually changes.
    pub fn transition_to(&mut self, status: TaskStatus, clock: &impl Clock) {
        if self.status != status {
            self.status = status;
            self.status_changed_at = clock.utc();
        }
    }

    /// Replaces the responsible actor.
    pub const fn set_responsible_actor(&mut self, actor_id: Option<ActorId>) {
        self.responsible_actor = actor_id;
    }

    /// Replaces the assistant actors.
    pub fn set_assistant_actors(&mut self, actors: impl IntoIterator<Item = ActorId>) {
        self.assistant_actors = actors.into_iter().collect();
    }

    /// Replaces the observer actors.
    pub fn set_observer_actors(&mut self, actors: impl IntoIterator<Item = ActorId>) {
        self.observer_actors = actors.into_iter().collect();
    }

    /// Replaces the covered geos.
    pub fn set_geo_ids(&mut self, geo_ids: impl IntoIterator<Item = GeoId>) {
        self.geo_ids = geo_ids.into_iter().collect();
    }

    /// Replaces the planned schedule.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSchedule`] when the planned finish
    /// precedes the planned start.
    pub fn set_schedule(
        &mut self,
        planned_start_at: Option<DateTime<Utc>>,
        planned_finish_at: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        validate_schedule(planned_start_at, planned_finish_at)?;
        self.planned_start_at = planned_start_at;
        self.planned_finish_at = planned_finish_at;
        Ok(())
    }

    /// Sets the archive flag.
    pub const fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }

    /// Returns a copy of this task with only the archive flag set.
    #[must_use]
    pub fn archived(&self) -> Self {
        let mut copy = self.clone();
        copy.is_archived = true;
        copy
    }

    /// Removes an actor from every participant slot.
    ///
    /// Returns `true` when anything changed.
    pub fn scrub_actor(&mut self, actor_id: ActorId) -> bool {
        let mut changed = false;
        if self.responsible_actor == Some(actor_id) {
            self.responsible_actor = None;
            changed = true;
        }
        changed |= self.assistant_actors.remove(&actor_id);
        changed |= self.observer_actors.remove(&actor_id);
        changed
    }

    /// Removes a geo reference. Returns `true` when it was present.
    pub fn scrub_geo(&mut self, geo_id: GeoId) -> bool {
        self.geo_ids.remove(&geo_id)
    }

    /// Appends an audit entry. Earlier entries are never touched.
    pub fn append_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Replaces the history with the history of another snapshot.
    ///
    /// Used when an update snapshot is rebuilt from a stored task so the
    /// stored history, not a caller-supplied one, is carried forward.
    pub(crate) fn carry_history_from(&mut self, stored: &Self) {
        self.history.clone_from(&stored.history);
    }

    pub(crate) const fn restore_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) const fn restore_status_changed_at(&mut self, changed_at: DateTime<Utc>) {
        self.status_changed_at = changed_at;
    }

    pub(crate) const fn restore_planned_start_at(&mut self, value: Option<DateTime<Utc>>) {
        self.planned_start_at = value;
    }

    pub(crate) const fn restore_planned_finish_at(&mut self, value: Option<DateTime<Utc>>) {
        self.planned_finish_at = value;
    }

    pub(crate) const fn assistant_actors_mut(&mut self) -> &mut BTreeSet<ActorId> {
        &mut self.assistant_actors
    }

    pub(crate) const fn observer_actors_mut(&mut self) -> &mut BTreeSet<ActorId> {
        &mut self.observer_actors
    }

    pub(crate) const fn geo_ids_mut(&mut self) -> &mut BTreeSet<GeoId> {
        &mut self.geo_ids
    }
}

fn normalize_title(raw: String) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle { entity: "task" });
    }
    Ok(trimmed.to_owned())
}

fn validate_schedule(
    planned_start_at: Option<DateTime<Utc>>,
    planned_finish_at: Option<DateTime<Utc>>,
) -> Result<(), DomainError> {
    match (planned_start_at, planned_finish_at) {
        (Some(start), Some(finish)) if finish < start => Err(DomainError::InvalidSchedule),
        _ => Ok(()),
    }
}
