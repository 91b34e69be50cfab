//! Actor account management.

use super::{
    Reconciliation, Repositories, ServiceError, ServiceResult, authorize, load_acting, reconcile,
};
use crate::access::{
    AccessContext, Action, CreateTarget, DeleteMode, DeleteTarget, EntityKind,
    PermissionEvaluator, ReadTarget, UpdateTarget, rules,
};
use crate::domain::{Actor, ActorId, Role};
use crate::history::AuditRecorder;
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    login: String,
    name: String,
    role: Role,
}

impl NewActor {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(login: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            login: login.into(),
            name: name.into(),
            role,
        }
    }
}

/// Field changes requested for an actor. Unset fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    login: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    is_archived: Option<bool>,
}

impl ActorChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the login.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Changes the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the global role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Changes the archive flag.
    #[must_use]
    pub const fn with_archived(mut self, is_archived: bool) -> Self {
        self.is_archived = Some(is_archived);
        self
    }

    fn apply_to(&self, stored: &Actor) -> ServiceResult<Actor> {
        let mut updated = stored.clone();
        if let Some(login) = &self.login {
            updated.set_login(login.as_str())?;
        }
        if let Some(name) = &self.name {
            updated.set_name(name.as_str());
        }
        if let Some(role) = self.role {
            updated.set_role(role);
        }
        if let Some(is_archived) = self.is_archived {
            updated.set_archived(is_archived);
        }
        Ok(updated)
    }
}

/// Actor account service.
#[derive(Clone)]
pub struct ActorService<C>
where
    C: Clock + Send + Sync,
{
    repositories: Repositories,
    clock: Arc<C>,
    evaluator: PermissionEvaluator,
    recorder: AuditRecorder,
}

impl<C> ActorService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new actor service.
    #[must_use]
    pub fn new(repositories: Repositories, clock: Arc<C>) -> Self {
        Self {
            repositories,
            clock,
            evaluator: PermissionEvaluator::new(),
            recorder: AuditRecorder::new(),
        }
    }

    /// Creates an actor account.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Domain`] for an invalid login,
    /// [`ServiceError::Access`] when the actor is not an admin or the login
    /// is taken, or [`ServiceError::Repository`] on persistence failure.
    pub async fn create(&self, acting: ActorId, request: NewActor) -> ServiceResult<Actor> {
        let actor = load_acting(&self.repositories, acting).await?;
        let candidate = Actor::new(request.login, request.name, request.role, &*self.clock)?;
        let login_taken = self
            .repositories
            .actors
            .find_by_login(candidate.login())
            .await?
            .is_some();

        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator.check_create(
                &context,
                CreateTarget::Actor {
                    candidate: &candidate,
                    login_taken,
                },
            ),
            acting,
            EntityKind::Actor,
            Action::Create,
        )?;

        self.repositories.actors.store(&candidate).await?;
        tracing::info!(actor_id = %candidate.id(), login = candidate.login(), "actor created");
        Ok(candidate)
    }

    /// Retrieves an actor account.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] for an
    /// inactive acting actor, or [`ServiceError::Repository`].
    pub async fn get(&self, acting: ActorId, id: ActorId) -> ServiceResult<Actor> {
        let actor = load_acting(&self.repositories, acting).await?;
        let target = self.require(id).await?;
        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator.check_read(&context, ReadTarget::Actor(&target)),
            acting,
            EntityKind::Actor,
            Action::Read,
        )?;
        Ok(target)
    }

    /// Lists every actor account, ordered by login.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Access`] for an inactive acting actor, or
    /// [`ServiceError::Repository`].
    pub async fn list(&self, acting: ActorId) -> ServiceResult<Vec<Actor>> {
        let actor = load_acting(&self.repositories, acting).await?;
        let context = AccessContext::new(actor.as_ref());
        authorize(
            rules::check_any_active(&context),
            acting,
            EntityKind::Actor,
            Action::Read,
        )?;
        Ok(self.repositories.actors.list().await?)
    }

    /// Applies changes to an actor account.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Domain`] for an
    /// invalid login, [`ServiceError::Access`] on refusal, or
    /// [`ServiceError::Repository`].
    pub async fn update(
        &self,
        acting: ActorId,
        id: ActorId,
        changes: ActorChanges,
    ) -> ServiceResult<Actor> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let updated = changes.apply_to(&stored)?;
        let login_taken = if updated.login() == stored.login() {
            false
        } else {
            self.repositories
                .actors
                .find_by_login(updated.login())
                .await?
                .is_some_and(|holder| holder.id() != id)
        };

        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator.check_update(
                &context,
                UpdateTarget::Actor {
                    old: &stored,
                    new: &updated,
                    login_taken,
                },
            ),
            acting,
            EntityKind::Actor,
            Action::Update,
        )?;

        self.repositories.actors.update(&updated).await?;
        Ok(updated)
    }

    /// Archives an actor account and returns the archived snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`].
    pub async fn archive(&self, acting: ActorId, id: ActorId) -> ServiceResult<Actor> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Actor(&stored), DeleteMode::Soft),
            acting,
            EntityKind::Actor,
            Action::SoftDelete,
        )?;

        let archived = stored.archived();
        self.repositories.actors.update(&archived).await?;
        tracing::info!(actor_id = %id, archived_by = %acting, "actor archived");
        Ok(archived)
    }

    /// Permanently removes an actor account and scrubs references to it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Access`] on
    /// refusal, or [`ServiceError::Repository`] /
    /// [`ServiceError::History`] from reconciliation.
    pub async fn delete(&self, acting: ActorId, id: ActorId) -> ServiceResult<Reconciliation> {
        let actor = load_acting(&self.repositories, acting).await?;
        let stored = self.require(id).await?;
        let context = AccessContext::new(actor.as_ref());
        authorize(
            self.evaluator
                .check_delete(&context, DeleteTarget::Actor(&stored), DeleteMode::Hard),
            acting,
            EntityKind::Actor,
            Action::HardDelete,
        )?;

        self.repositories.actors.delete(id).await?;
        let summary = reconcile::actor_removed(
            &self.repositories,
            &self.recorder,
            &*self.clock,
            acting,
            id,
        )
        .await?;
        tracing::info!(
            actor_id = %id,
            deleted_by = %acting,
            projects_updated = summary.projects_updated,
            tasks_updated = summary.tasks_updated,
            "actor deleted"
        );
        Ok(summary)
    }

    async fn require(&self, id: ActorId) -> ServiceResult<Actor> {
        self.repositories
            .actors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Actor, id))
    }
}
