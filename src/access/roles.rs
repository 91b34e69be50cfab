//! Effective role resolution.
//!
//! An actor's standing for a project-scoped operation is their global role
//! together with the project's override for them, if any. The two values
//! are kept side by side: rules decide how they combine.

use crate::domain::{Actor, Project, Role};

/// The global and project roles consulted for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectiveRoles {
    /// The actor's global role, absent when there is no actor.
    pub global: Option<Role>,
    /// The project override, absent when there is no project or no entry.
    pub project: Option<Role>,
}

impl EffectiveRoles {
    /// Returns `true` when either role is Admin.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self.any(Role::is_admin)
    }

    /// Returns `true` when either role is Admin or Manager.
    #[must_use]
    pub fn is_privileged(self) -> bool {
        self.any(Role::is_privileged)
    }

    /// Returns `true` when either role sees every task.
    #[must_use]
    pub fn can_view_all(self) -> bool {
        self.any(Role::can_view_all)
    }

    fn any(self, predicate: impl Fn(Role) -> bool) -> bool {
        self.global.is_some_and(&predicate) || self.project.is_some_and(&predicate)
    }
}

/// Resolves the roles an actor holds for a project context.
///
/// Without an actor both roles are absent; without a project only the
/// global role is present. A missing project entry is not an error.
#[must_use]
pub fn resolve_effective_role(actor: Option<&Actor>, project: Option<&Project>) -> EffectiveRoles {
    let Some(actor) = actor else {
        return EffectiveRoles::default();
    };
    EffectiveRoles {
        global: Some(actor.role()),
        project: project.and_then(|project| project.role_of(actor.id())),
    }
}
