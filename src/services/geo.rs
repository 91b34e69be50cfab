//! Geo management.
//!
//! A geo belongs to one project for its whole life and is listed in that
//! project's layers.

use super::{
    Reconciliation, Repositories, ServiceError, ServiceResult, authorize, load_acting, reconcile,
    require_project,
};
use crate::access::{
    AccessContext, Action, CreateTarget, DeleteMode, DeleteTarget, EntityKind,
    PermissionEvaluator, ReadTarget, UpdateTarget,
};
use crate::domain::{ActorId, Geo, GeoId, ProjectId};
use crate::history::AuditRecorder;
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a geo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGeo {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
}

impl NewGeo {
    /// Creates a request for a geo in the given project.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
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

/// Field changes requested for a geo. Unset fields stay as stored.
///
/// A project change is accepted here so it can be refused with a reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoChanges {
    title: Option<String>,
    description: Option<Option<String>>,
    project_id: Option<ProjectId>,
}

impl GeoChanges {
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

    /// Requests a move to another project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    fn apply_to(&self, stored: &Geo) -> ServiceResult<Geo> {
        let mut updated = stored.clone();
        if let Some(title) = &self.title {
            updated.set_title(title.as_str())?;
        }
        if let Some(description) = &self.description {
            updated.set_description(description.clone());
        }
        if let Some(project_id) = self.project_id {
            updated.set_project(project_id);
        }
        Ok(updated)
    }
}

/// Geo service.
#[derive(Clone)]
pub struct GeoService<C>
where
    C: Clock + Send + Sync,
{
    repositories: Repositories,
    clock: Arc<C>,
    evaluator: PermissionEvaluator,
    recorder: AuditRecorder,
}

impl<C> GeoService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new geo service.
    #[must_use]
    pub fn new(repositories: Repositories, clock: Arc<C>) -> Self {
        Self {
            repositories,
            clock,
            evaluator: PermissionEvaluator::new(),
            recorder: AuditRecorder::new(),
        }
    }

    /// Creates a geo and adds it to its project's layers.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown project,
    /// [`ServiceError::Domain`] for a blank title, [`ServiceError::Access`]
    /// on refusal, or [`ServiceError::Repository`].
    pub async fn create(&self, acting: ActorId, request: NewGeo) -> ServiceResult<Geo> {
        let actor = load_acting(&self.repositories, acting).await?;
        let mut project = require_project(&self.repositories, request.project_id).await?;
        let mut geo = Geo::new(request.project_id, request.title, acting, &*self.clock)?;
        if let Some(description) = request.description {
            geo = geo.with_description(description);
        }

        let context = AccessContext::resolve(actor.as_ref(), Some(&project));
        authorize(
            self.evaluator.check_create(&context, CreateTarget::Geo(&geo)),
            acting,
            EntityKind::Geo,
            Action::Create,
        )?;

        self.repositories.geos.store(&geo).await?;
        if project.add_layer(geo.id()) {
            self.repositories.projects.update(&project).await?;
        }
        tracing::info!(geo_id = %geo.id(), project_id = %project.id(), created_by = %acting, "geo created");
        Ok(geo)
    }

    /// Retrieves a geo.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] for an
    /// inactive acting actor, or [`ServiceError::Repository`].
    pub async fn get(&self, acting: ActorId, id: GeoId) -> ServiceResult<Geo> {
        let actor = load_acting(&self.repositories, acting).await?;
        let geo = self.require(id).await?;
        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator.check_read(&context, ReadTarget::Geo(&geo)),
            acting,
            EntityKind::Geo,
            Action::Read,
        )?;
        Ok(geo)
    }

    /// Lists the geos of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown project,
    /// [`ServiceError::Access`] for an inactive acting actor, or
    /// [`ServiceError::Repository`].
    pub async fn list_by_project(
        &self,
        acting: ActorId,
        project_id: ProjectId,
    ) -> ServiceResult<Vec<Geo>> {
        let actor = load_acting(&self.repositories, acting).await?;
        let project = require_project(&self.repositories, project_id).await?;
        let context = AccessContext::resolve(actor.as_ref(), Some(&project));
        authorize(
            self.evaluator
                .check_read(&context, ReadTarget::Project(&project)),
            acting,
            EntityKind::Geo,
            Action::Read,
        )?;
        Ok(self.repositories.geos.find_by_project(project_id).await?)
    }

    /// Applies changes to a geo.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Domain`],
    /// [`ServiceError::Access`] on refusal (including any project change),
    /// or [`ServiceError::Repository`].
    pub async fn update(
        &self,
        acting: ActorId,
        id: GeoId,
        changes: GeoChanges,
    ) -> ServiceResult<Geo> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let updated = changes.apply_to(&stored)?;
        let current = self.repositories.projects.find_by_id(stored.project_id()).await?;
        let target = if updated.project_id() == stored.project_id() {
            current.clone()
        } else {
            self.repositories.projects.find_by_id(updated.project_id()).await?
        };

        let context = AccessContext::resolve(actor.as_ref(), current.as_ref())
            .with_target_project(target.as_ref());
        authorize(
            self.evaluator.check_update(
                &context,
                UpdateTarget::Geo {
                    old: &stored,
                    new: &updated,
                },
            ),
            acting,
            EntityKind::Geo,
            Action::Update,
        )?;

        self.repositories.geos.update(&updated).await?;
        Ok(updated)
    }

    /// Archives a geo and returns the archived snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn archive(&self, acting: ActorId, id: GeoId) -> ServiceResult<Geo> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let project = self.repositories.projects.find_by_id(stored.project_id()).await?;
        let context = AccessContext::resolve(actor.as_ref(), project.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Geo(&stored), DeleteMode::Soft),
            acting,
            EntityKind::Geo,
            Action::SoftDelete,
        )?;

        let archived = stored.archived();
        self.repositories.geos.update(&archived).await?;
        tracing::info!(geo_id = %id, archived_by = %acting, "geo archived");
        Ok(archived)
    }

    /// Permanently removes a geo and scrubs references to it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`] /
    /// [`ServiceError::History`] from reconciliation.
    pub async fn delete(&self, acting: ActorId, id: GeoId) -> ServiceResult<Reconciliation> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let project = self.repositories.projects.find_by_id(stored.project_id()).await?;
        let context = AccessContext::resolve(actor.as_ref(), project.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Geo(&stored), DeleteMode::Hard),
            acting,
            EntityKind::Geo,
            Action::HardDelete,
        )?;

        self.repositories.geos.delete(id).await?;
        let summary = reconcile::geo_removed(
            &self.repositories,
            &self.recorder,
            &*self.clock,
            acting,
            &stored,
        )
        .await?;
        tracing::info!(
            geo_id = %id,
            deleted_by = %acting,
            tasks_updated = summary.tasks_updated,
            "geo deleted"
        );
        Ok(summary)
    }

    async fn require(&self, id: GeoId) -> ServiceResult<Geo> {
        self.repositories
            .geos
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Geo, id))
    }
}
