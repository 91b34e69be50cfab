//! Project management and membership.

use super::{
    Reconciliation, Repositories, ServiceError, ServiceResult, authorize, load_acting, reconcile,
    require_project,
};
use crate::access::{
    AccessContext, Action, CreateTarget, DeleteMode, DeleteTarget, EntityKind,
    PermissionEvaluator, ReadTarget, UpdateTarget, rules,
};
use crate::domain::{Actor, ActorId, Project, ProjectId, Role};
use crate::history::AuditRecorder;
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    title: String,
    description: Option<String>,
}

impl NewProject {
    /// Creates a request with the project title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field changes requested for a project. Unset fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    title: Option<String>,
    description: Option<Option<String>>,
}

impl ProjectChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    fn apply_to(&self, stored: &Project) -> ServiceResult<Project> {
        let mut updated = stored.clone();
        if let Some(title) = &self.title {
            updated.set_title(title.as_str())?;
        }
        if let Some(description) = &self.description {
            updated.set_description(description.clone());
        }
        Ok(updated)
    }
}

/// Project service.
#[derive(Clone)]
pub struct ProjectService<C>
where
    C: Clock + Send + Sync,
{
    repositories: Repositories,
    clock: Arc<C>,
    evaluator: PermissionEvaluator,
    recorder: AuditRecorder,
}

impl<C> ProjectService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub fn new(repositories: Repositories, clock: Arc<C>) -> Self {
        Self {
            repositories,
            clock,
            evaluator: PermissionEvaluator::new(),
            recorder: AuditRecorder::new(),
        }
    }

    /// Creates a project. Only the global role counts, since the project has
    /// no members yet.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Domain`] for a blank title,
    /// [`ServiceError::Access`] on refusal, or [`ServiceError::Repository`].
    pub async fn create(&self, acting: ActorId, request: NewProject) -> ServiceResult<Project> {
        let actor = load_acting(&self.repositories, acting).await?;
        let mut project = Project::new(request.title, &*self.clock)?;
        if let Some(description) = request.description {
            project = project.with_description(description);
        }

        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator
                .check_create(&context, CreateTarget::Project(&project)),
            acting,
            EntityKind::Project,
            Action::Create,
        )?;

        self.repositories.projects.store(&project).await?;
        tracing::info!(project_id = %project.id(), created_by = %acting, "project created");
        Ok(project)
    }

    /// Retrieves a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] for an
    /// inactive acting actor, or [`ServiceError::Repository`].
    pub async fn get(&self, acting: ActorId, id: ProjectId) -> ServiceResult<Project> {
        let actor = load_acting(&self.repositories, acting).await?;
        let project = require_project(&self.repositories, id).await?;
        let context = AccessContext::resolve(actor.as_ref(), Some(&project));
        authorize(
            self.evaluator
                .check_read(&context, ReadTarget::Project(&project)),
            acting,
            EntityKind::Project,
            Action::Read,
        )?;
        Ok(project)
    }

    /// Lists every project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Access`] for an inactive acting actor, or
    /// [`ServiceError::Repository`].
    pub async fn list(&self, acting: ActorId) -> ServiceResult<Vec<Project>> {
        let actor = load_acting(&self.repositories, acting).await?;
        authorize(
            rules::check_any_active(&AccessContext::new(actor.as_ref())),
            acting,
            EntityKind::Project,
            Action::Read,
        )?;
        Ok(self.repositories.projects.list().await?)
    }

    /// Applies changes to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Domain`],
    /// [`ServiceError::Access`] on refusal, or [`ServiceError::Repository`].
    pub async fn update(
        &self,
        acting: ActorId,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> ServiceResult<Project> {
        let stored = require_project(&self.repositories, id).await?;
        let updated = changes.apply_to(&stored)?;
        self.save_change(acting, &stored, updated).await
    }

    /// Gives an actor a role in the project, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the project or member does
    /// not exist, [`ServiceError::Access`] on refusal, or
    /// [`ServiceError::Repository`].
    pub async fn assign_role(
        &self,
        acting: ActorId,
        id: ProjectId,
        member: ActorId,
        role: Role,
    ) -> ServiceResult<Project> {
        let stored = require_project(&self.repositories, id).await?;
        let member_exists = self.repositories.actors.find_by_id(member).await?.is_some();
        if !member_exists {
            return Err(ServiceError::not_found(EntityKind::Actor, member));
        }
        let mut updated = stored.clone();
        updated.assign_role(member, role);
        self.save_change(acting, &stored, updated).await
    }

    /// Removes an actor's project role.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn remove_member(
        &self,
        acting: ActorId,
        id: ProjectId,
        member: ActorId,
    ) -> ServiceResult<Project> {
        let stored = require_project(&self.repositories, id).await?;
        let mut updated = stored.clone();
        updated.remove_member(member);
        self.save_change(acting, &stored, updated).await
    }

    /// Archives a project and returns the archived snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn archive(&self, acting: ActorId, id: ProjectId) -> ServiceResult<Project> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = require_project(&self.repositories, id).await?;
        let context = AccessContext::resolve(actor.as_ref(), Some(&stored));
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Project(&stored), DeleteMode::Soft),
            acting,
            EntityKind::Project,
            Action::SoftDelete,
        )?;

        let archived = stored.archived();
        self.repositories.projects.update(&archived).await?;
        tracing::info!(project_id = %id, archived_by = %acting, "project archived");
        Ok(archived)
    }

    /// Permanently removes a project together with its tasks and geos.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, [`ServiceError::Repository`], or [`ServiceError::History`]
    /// when a task covering one of its geos cannot be rewritten.
    pub async fn delete(&self, acting: ActorId, id: ProjectId) -> ServiceResult<Reconciliation> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = require_project(&self.repositories, id).await?;
        let context = AccessContext::resolve(actor.as_ref(), Some(&stored));
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Project(&stored), DeleteMode::Hard),
            acting,
            EntityKind::Project,
            Action::HardDelete,
        )?;

        self.repositories.projects.delete(id).await?;
        let summary = reconcile::project_removed(
            &self.repositories,
            &self.recorder,
            &*self.clock,
            acting,
            id,
        )
        .await?;
        tracing::info!(
            project_id = %id,
            deleted_by = %acting,
            tasks_deleted = summary.tasks_deleted,
            geos_deleted = summary.geos_deleted,
            "project deleted"
        );
        Ok(summary)
    }

    /// Approves and writes a project change. The acting actor's role is
    /// resolved from both the stored and the changed membership.
    async fn save_change(
        &self,
        acting: ActorId,
        stored: &Project,
        updated: Project,
    ) -> ServiceResult<Project> {
        let actor: Option<Actor> = load_acting(&self.repositories, acting).await?;
        let context =
            AccessContext::resolve(actor.as_ref(), Some(stored)).with_target_project(Some(&updated));
        authorize(
            self.evaluator.check_update(
                &context,
                UpdateTarget::Project {
                    old: stored,
                    new: &updated,
                },
            ),
            acting,
            EntityKind::Project,
            Action::Update,
        )?;

        self.repositories.projects.update(&updated).await?;
        Ok(updated)
    }
}
