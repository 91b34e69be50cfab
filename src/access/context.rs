//! Per-request access context.

use super::{AccessDenied, AccessResult, EffectiveRoles, resolve_effective_role};
use crate::domain::{Actor, Project, Role};

/// The acting actor and the project roles resolved for one request.
///
/// `project_role` is the actor's role in the project the entity currently
/// belongs to. `target_project_role` is their role in the project the
/// entity will belong to after an update; it equals `project_role` unless
/// the context is retargeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext<'a> {
    actor: Option<&'a Actor>,
    project_role: Option<Role>,
    target_project_role: Option<Role>,
}

impl<'a> AccessContext<'a> {
    /// Creates a context without project scope.
    #[must_use]
    pub const fn new(actor: Option<&'a Actor>) -> Self {
        Self {
            actor,
            project_role: None,
            target_project_role: None,
        }
    }

    /// Creates a context scoped to a project.
    #[must_use]
    pub fn resolve(actor: Option<&'a Actor>, project: Option<&Project>) -> Self {
        let roles = resolve_effective_role(actor, project);
        Self {
            actor,
            project_role: roles.project,
            target_project_role: roles.project,
        }
    }

    /// Resolves the target project role from another project snapshot.
    #[must_use]
    pub fn with_target_project(mut self, project: Option<&Project>) -> Self {
        self.target_project_role = resolve_effective_role(self.actor, project).project;
        self
    }

    /// Sets both project roles explicitly.
    #[must_use]
    pub const fn with_project_roles(mut self, current: Option<Role>, target: Option<Role>) -> Self {
        self.project_role = current;
        self.target_project_role = target;
        self
    }

    /// Returns the acting actor, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&'a Actor> {
        self.actor
    }

    /// Returns the acting actor's global role.
    #[must_use]
    pub fn global_role(&self) -> Option<Role> {
        self.actor.map(Actor::role)
    }

    /// Returns the role in the current project.
    #[must_use]
    pub const fn project_role(&self) -> Option<Role> {
        self.project_role
    }

    /// Returns the role in the target project.
    #[must_use]
    pub const fn target_project_role(&self) -> Option<Role> {
        self.target_project_role
    }

    /// Returns the roles for the current project.
    #[must_use]
    pub fn roles(&self) -> EffectiveRoles {
        EffectiveRoles {
            global: self.global_role(),
            project: self.project_role,
        }
    }

    /// Returns the roles for the target project.
    #[must_use]
    pub fn target_roles(&self) -> EffectiveRoles {
        EffectiveRoles {
            global: self.global_role(),
            project: self.target_project_role,
        }
    }

    /// Returns the acting actor when present and not archived.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::MissingActor`] or
    /// [`AccessDenied::ArchivedActor`].
    pub fn active_actor(&self) -> AccessResult<&'a Actor> {
        let actor = self.actor.ok_or(AccessDenied::MissingActor)?;
        if actor.is_archived() {
            return Err(AccessDenied::ArchivedActor(actor.id()));
        }
        Ok(actor)
    }
}
