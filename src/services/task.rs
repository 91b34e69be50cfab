//! Task management: creation, workflow updates, audit history and listing.

use super::{
    Repositories, ServiceError, ServiceResult, authorize, load_acting, require_project,
};
use crate::access::{
    AccessContext, Action, CreateTarget, DeleteMode, DeleteTarget, EntityKind,
    PermissionEvaluator, ReadTarget, TaskFilter, UpdateTarget, augment_list_filter,
};
use crate::domain::{
    ActorId, GeoId, HistoryEntry, Project, ProjectId, Task, TaskId, TaskStatus,
};
use crate::history::{AuditConfig, AuditRecorder, HistoryNote};
use crate::ports::{PageRequest, TaskPage};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    responsible_actor: Option<ActorId>,
    assistant_actors: BTreeSet<ActorId>,
    observer_actors: BTreeSet<ActorId>,
    geo_ids: BTreeSet<GeoId>,
    planned_start_at: Option<DateTime<Utc>>,
    planned_finish_at: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates a request for a task in the given project.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            responsible_actor: None,
            assistant_actors: BTreeSet::new(),
            observer_actors: BTreeSet::new(),
            geo_ids: BTreeSet::new(),
            planned_start_at: None,
            planned_finish_at: None,
        }
    }

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

    /// Sets the covered geos.
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

    fn build(self, created_by: ActorId, clock: &impl Clock) -> ServiceResult<Task> {
        let mut builder = Task::builder(self.project_id, self.title, created_by)
            .with_assistant_actors(self.assistant_actors)
            .with_observer_actors(self.observer_actors)
            .with_geo_ids(self.geo_ids)
            .with_schedule(self.planned_start_at, self.planned_finish_at);
        if let Some(description) = self.description {
            builder = builder.with_description(description);
        }
        if let Some(responsible) = self.responsible_actor {
            builder = builder.with_responsible_actor(responsible);
        }
        Ok(builder.build(clock)?)
    }
}

/// Field changes requested for a task. Unset fields stay as stored.
///
/// The stored snapshot is copied and the changes applied to the copy, so
/// the old and new snapshots the evaluator compares differ only where the
/// request asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    project_id: Option<ProjectId>,
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    responsible_actor: Option<Option<ActorId>>,
    assistant_actors: Option<BTreeSet<ActorId>>,
    observer_actors: Option<BTreeSet<ActorId>>,
    geo_ids: Option<BTreeSet<GeoId>>,
    schedule: Option<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)>,
}

impl TaskChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the task to another project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Changes the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Requests a status change.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces or clears the responsible actor.
    #[must_use]
    pub const fn with_responsible_actor(mut self, actor_id: Option<ActorId>) -> Self {
        self.responsible_actor = Some(actor_id);
        self
    }

    /// Replaces the assistant actors.
    #[must_use]
    pub fn with_assistant_actors(mut self, actors: impl IntoIterator<Item = ActorId>) -> Self {
        self.assistant_actors = Some(actors.into_iter().collect());
        self
    }

    /// Replaces the observer actors.
    #[must_use]
    pub fn with_observer_actors(mut self, actors: impl IntoIterator<Item = ActorId>) -> Self {
        self.observer_actors = Some(actors.into_iter().collect());
        self
    }

    /// Replaces the covered geos.
    #[must_use]
    pub fn with_geo_ids(mut self, geo_ids: impl IntoIterator<Item = GeoId>) -> Self {
        self.geo_ids = Some(geo_ids.into_iter().collect());
        self
    }

    /// Replaces the planned schedule.
    #[must_use]
    pub const fn with_schedule(
        mut self,
        planned_start_at: Option<DateTime<Utc>>,
        planned_finish_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.schedule = Some((planned_start_at, planned_finish_at));
        self
    }

    fn apply_to(&self, stored: &Task, clock: &impl Clock) -> ServiceResult<Task> {
        let mut updated = stored.clone();
        if let Some(project_id) = self.project_id {
            updated.set_project(project_id);
        }
        if let Some(title) = &self.title {
            updated.set_title(title.as_str())?;
        }
        if let Some(description) = &self.description {
            updated.set_description(description.clone());
        }
        if let Some(status) = self.status {
            updated.transition_to(status, clock);
        }
        if let Some(responsible) = self.responsible_actor {
            updated.set_responsible_actor(responsible);
        }
        if let Some(actors) = &self.assistant_actors {
            updated.set_assistant_actors(actors.iter().copied());
        }
        if let Some(actors) = &self.observer_actors {
            updated.set_observer_actors(actors.iter().copied());
        }
        if let Some(geo_ids) = &self.geo_ids {
            updated.set_geo_ids(geo_ids.iter().copied());
        }
        if let Some((planned_start_at, planned_finish_at)) = self.schedule {
            updated.set_schedule(planned_start_at, planned_finish_at)?;
        }
        Ok(updated)
    }
}

/// Task service.
#[derive(Clone)]
pub struct TaskService<C>
where
    C: Clock + Send + Sync,
{
    repositories: Repositories,
    clock: Arc<C>,
    evaluator: PermissionEvaluator,
    recorder: AuditRecorder,
}

impl<C> TaskService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new task service with the default audit configuration.
    #[must_use]
    pub fn new(repositories: Repositories, clock: Arc<C>) -> Self {
        Self {
            repositories,
            clock,
            evaluator: PermissionEvaluator::new(),
            recorder: AuditRecorder::new(),
        }
    }

    /// Replaces the audit configuration.
    #[must_use]
    pub fn with_audit_config(mut self, config: AuditConfig) -> Self {
        self.recorder = AuditRecorder::with_config(config);
        self
    }

    /// Creates a task in a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown project,
    /// [`ServiceError::Domain`] for invalid fields, [`ServiceError::Access`]
    /// on refusal, or [`ServiceError::Repository`].
    pub async fn create(&self, acting: ActorId, request: NewTask) -> ServiceResult<Task> {
        let actor = load_acting(&self.repositories, acting).await?;
        let project = require_project(&self.repositories, request.project_id).await?;
        let task = request.build(acting, &*self.clock)?;

        let context = AccessContext::resolve(actor.as_ref(), Some(&project));
        authorize(
            self.evaluator.check_create(&context, CreateTarget::Task(&task)),
            acting,
            EntityKind::Task,
            Action::Create,
        )?;

        self.repositories.tasks.store(&task).await?;
        tracing::info!(
            task_id = %task.id(),
            project_id = %project.id(),
            created_by = %acting,
            "task created"
        );
        Ok(task)
    }

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] when the
    /// actor may not see the task, or [`ServiceError::Repository`].
    pub async fn get(&self, acting: ActorId, id: TaskId) -> ServiceResult<Task> {
        let actor = load_acting(&self.repositories, acting).await?;
        let task = self.require(id).await?;
        let project = self.project_of(&task).await?;
        let context = AccessContext::resolve(actor.as_ref(), project.as_ref());
        authorize(
            self.evaluator.check_read(&context, ReadTarget::Task(&task)),
            acting,
            EntityKind::Task,
            Action::Read,
        )?;
        Ok(task)
    }

    /// Returns a task's audit history, oldest first.
    ///
    /// # Errors
    ///
    /// As for [`TaskService::get`].
    pub async fn history(&self, acting: ActorId, id: TaskId) -> ServiceResult<Vec<HistoryEntry>> {
        let task = self.get(acting, id).await?;
        Ok(task.history().to_vec())
    }

    /// Lists the tasks matching `base` that the actor may see.
    ///
    /// For a project-scoped query the actor's role in that project counts
    /// alongside their global role.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] on persistence failure. A
    /// missing or archived actor gets an empty page rather than an error.
    pub async fn list(
        &self,
        acting: ActorId,
        base: TaskFilter,
        page: PageRequest,
    ) -> ServiceResult<TaskPage> {
        let actor = load_acting(&self.repositories, acting).await?;
        let project_role = match (actor.as_ref(), base.project_scope()) {
            (Some(actor), Some(project_id)) => self
                .repositories
                .projects
                .find_by_id(project_id)
                .await?
                .and_then(|project| project.role_of(actor.id())),
            _ => None,
        };

        let filter = augment_list_filter(base, actor.as_ref(), project_role);
        tracing::debug!(actor_id = %acting, predicates = filter.predicates().len(), "listing tasks");
        Ok(self.repositories.tasks.find_by_filter(&filter, page).await?)
    }

    /// Applies changes to a task and records them in its history.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown task or target
    /// project, [`ServiceError::Domain`] for invalid fields,
    /// [`ServiceError::Access`] on refusal (including illegal status
    /// transitions), [`ServiceError::History`] for an oversized note, or
    /// [`ServiceError::Repository`].
    pub async fn update(
        &self,
        acting: ActorId,
        id: TaskId,
        changes: TaskChanges,
        note: Option<HistoryNote>,
    ) -> ServiceResult<Task> {
        let stored = self.require(id).await?;
        let updated = changes.apply_to(&stored, &*self.clock)?;
        self.save_change(acting, &stored, updated, note.as_ref()).await
    }

    /// Requests a status change.
    ///
    /// # Errors
    ///
    /// As for [`TaskService::update`].
    pub async fn transition(
        &self,
        acting: ActorId,
        id: TaskId,
        status: TaskStatus,
        note: Option<HistoryNote>,
    ) -> ServiceResult<Task> {
        self.update(acting, id, TaskChanges::new().with_status(status), note)
            .await
    }

    /// Replaces a task with a caller-built snapshot.
    ///
    /// The stored history is kept; any history on the snapshot is ignored.
    /// `status_changed_at` is taken from the stored task and restamped only
    /// when the snapshot's status differs from the stored one.
    ///
    /// # Errors
    ///
    /// As for [`TaskService::update`].
    pub async fn replace(
        &self,
        acting: ActorId,
        mut snapshot: Task,
        note: Option<HistoryNote>,
    ) -> ServiceResult<Task> {
        let stored = self.require(snapshot.id()).await?;
        snapshot.carry_history_from(&stored);
        let requested = snapshot.status();
        snapshot.restore_status(stored.status());
        snapshot.restore_status_changed_at(stored.status_changed_at());
        snapshot.transition_to(requested, &*self.clock);
        self.save_change(acting, &stored, snapshot, note.as_ref()).await
    }

    /// Archives a task, records the archive in its history and returns the
    /// archived snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn archive(&self, acting: ActorId, id: TaskId) -> ServiceResult<Task> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let project = self.project_of(&stored).await?;
        let context = AccessContext::resolve(actor.as_ref(), project.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Task(&stored), DeleteMode::Soft),
            acting,
            EntityKind::Task,
            Action::SoftDelete,
        )?;

        let mut archived = stored.archived();
        if let Some(entry) = self
            .recorder
            .record(&stored, &archived, acting, None, &*self.clock)?
        {
            archived.append_history(entry);
        }
        self.repositories.tasks.update(&archived).await?;
        tracing::info!(task_id = %id, archived_by = %acting, "task archived");
        Ok(archived)
    }

    /// Permanently removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn delete(&self, acting: ActorId, id: TaskId) -> ServiceResult<()> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let project = self.project_of(&stored).await?;
        let context = AccessContext::resolve(actor.as_ref(), project.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Task(&stored), DeleteMode::Hard),
            acting,
            EntityKind::Task,
            Action::HardDelete,
        )?;

        self.repositories.tasks.delete(id).await?;
        tracing::info!(task_id = %id, deleted_by = %acting, "task deleted");
        Ok(())
    }

    /// Approves, records and writes a task change.
    ///
    /// Roles are resolved for the stored project and, when the task moves,
    /// for the destination project too.
    async fn save_change(
        &self,
        acting: ActorId,
        stored: &Task,
        mut updated: Task,
        note: Option<&HistoryNote>,
    ) -> ServiceResult<Task> {
        let actor = load_acting(&self.repositories, acting).await?;
        let current = self.project_of(stored).await?;
        let target = if updated.project_id() == stored.project_id() {
            current.clone()
        } else {
            Some(require_project(&self.repositories, updated.project_id()).await?)
        };

        let context = AccessContext::resolve(actor.as_ref(), current.as_ref())
            .with_target_project(target.as_ref());
        authorize(
            self.evaluator.check_update(
                &context,
                UpdateTarget::Task {
                    old: stored,
                    new: &updated,
                },
            ),
            acting,
            EntityKind::Task,
            Action::Update,
        )?;

        if let Some(entry) = self
            .recorder
            .record(stored, &updated, acting, note, &*self.clock)?
        {
            tracing::debug!(task_id = %updated.id(), operations = entry.operations.len(), "history recorded");
            updated.append_history(entry);
        }
        self.repositories.tasks.update(&updated).await?;
        Ok(updated)
    }

    async fn require(&self, id: TaskId) -> ServiceResult<Task> {
        self.repositories
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))
    }

    async fn project_of(&self, task: &Task) -> ServiceResult<Option<Project>> {
        Ok(self.repositories.projects.find_by_id(task.project_id()).await?)
    }
}
