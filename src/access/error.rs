//! Access denial reasons.
//!
//! Precondition failures, role denials and workflow violations all travel
//! through [`AccessDenied`], so callers translate every denial into the same
//! "forbidden" outcome and only the reason text tells them apart.

use crate::domain::{ActorId, TaskStatus};
use std::fmt;
use thiserror::Error;

/// The kind of entity an access check concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An actor account.
    Actor,
    /// A project.
    Project,
    /// A geospatial region.
    Geo,
    /// A task.
    Task,
}

impl EntityKind {
    /// Returns the lowercase name used in reasons and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Project => "project",
            Self::Geo => "geo",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operation an access check concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Creating an entity.
    Create,
    /// Reading or listing an entity.
    Read,
    /// Updating an entity.
    Update,
    /// Archiving an entity.
    SoftDelete,
    /// Permanently removing an entity.
    HardDelete,
}

impl Action {
    /// Returns the lowercase name used in reasons and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::SoftDelete => "archive",
            Self::HardDelete => "permanently delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDenied {
    /// No acting actor was supplied.
    #[error("an acting actor is required")]
    MissingActor,

    /// The acting actor is archived.
    #[error("actor {0} is archived")]
    ArchivedActor(ActorId),

    /// The acting actor lacks the role the operation needs.
    #[error("{action} {entity} requires {required}")]
    InsufficientRole {
        /// The refused operation.
        action: Action,
        /// The entity kind.
        entity: EntityKind,
        /// Human-readable description of the required standing.
        required: &'static str,
    },

    /// A global observer lacks a contributing role in an affected project.
    #[error("observers may only modify tasks in projects where they hold a contributing role")]
    GlobalObserver,

    /// The acting actor is an observer in an affected project.
    #[error("actor is an observer in an affected project")]
    ProjectObserver,

    /// Another actor already uses the login.
    #[error("login '{0}' is already taken")]
    DuplicateLogin(String),

    /// An actor tried to change their own role.
    #[error("actors cannot change their own role")]
    SelfRoleChange,

    /// An actor tried to change their own archive flag.
    #[error("actors cannot archive or restore themselves")]
    SelfArchiveChange,

    /// An actor tried to delete themself.
    #[error("actors cannot delete themselves")]
    SelfDeletion,

    /// A geo was moved to another project.
    #[error("a geo cannot be moved to another project")]
    ProjectChangeForbidden,

    /// The entity is already archived.
    #[error("{0} is already archived")]
    AlreadyArchived(EntityKind),

    /// A field only admins and managers may change was changed.
    #[error("field {0} may only be changed by an admin or manager")]
    ProtectedFieldChanged(String),

    /// The status change is not one an unprivileged actor may request.
    #[error("status cannot change from {from} to {to}")]
    IllegalStatusTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Several independent checks failed.
    #[error("multiple access denials: {}", format_denials(.0))]
    Multiple(Vec<Self>),
}

fn format_denials(denials: &[AccessDenied]) -> String {
    denials
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AccessDenied {
    /// Creates an insufficient-role denial.
    #[must_use]
    pub const fn insufficient(action: Action, entity: EntityKind, required: &'static str) -> Self {
        Self::InsufficientRole {
            action,
            entity,
            required,
        }
    }

    /// Combines denials, flattening nested `Multiple` values.
    ///
    /// A single denial is returned unwrapped.
    #[must_use]
    pub fn multiple(denials: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(denials.len());
        for denial in denials {
            match denial {
                Self::Multiple(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(single) = flat.pop() {
                return single;
            }
        }
        Self::Multiple(flat)
    }

    /// Returns the individual denials.
    #[must_use]
    pub fn denials(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(inner) => inner.iter().collect(),
            other => vec![other],
        }
    }

    /// Returns one human-readable reason per individual denial.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.denials().into_iter().map(ToString::to_string).collect()
    }
}

/// Result of an access check.
pub type AccessResult<T = ()> = Result<T, AccessDenied>;

/// Folds collected denials into a result.
pub(crate) fn conclude(denials: Vec<AccessDenied>) -> AccessResult {
    if denials.is_empty() {
        Ok(())
    } else {
        Err(AccessDenied::multiple(denials))
    }
}

/// Flat decision shape for callers that report `ok` plus reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the operation may proceed.
    pub ok: bool,
    /// Reasons for a refusal; empty when allowed.
    pub reasons: Vec<String>,
}

impl From<AccessResult> for AccessDecision {
    fn from(result: AccessResult) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                reasons: Vec::new(),
            },
            Err(denied) => Self {
                ok: false,
                reasons: denied.reasons(),
            },
        }
    }
}
