//! Actor roles shared by the global and project-scoped role models.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by an actor, either globally or inside one project.
///
/// Roles are compared by identity. Privilege checks go through the grouping
/// helpers below rather than through declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full control over every entity.
    Admin,
    /// Manages projects, geos and tasks.
    Manager,
    /// Works on tasks they participate in.
    Actor,
    /// Read-only visibility.
    Observer,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Manager, Self::Actor, Self::Observer];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Actor => "actor",
            Self::Observer => "observer",
        }
    }

    /// Returns `true` for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns `true` for roles that may manage entities: Admin and Manager.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Returns `true` for roles that see every task: Admin, Manager and
    /// Observer.
    #[must_use]
    pub const fn can_view_all(self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Observer)
    }

    /// Returns `true` for roles that may modify tasks: everything except
    /// Observer.
    #[must_use]
    pub const fn is_contributor(self) -> bool {
        !matches!(self, Self::Observer)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "actor" => Ok(Self::Actor),
            "observer" => Ok(Self::Observer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
