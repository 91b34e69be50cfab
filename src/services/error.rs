//! Service-level errors.

use crate::access::{AccessDenied, EntityKind};
use crate::domain::DomainError;
use crate::history::HistoryError;
use crate::ports::RepositoryError;
use thiserror::Error;

/// Errors returned by the application services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The acting actor may not perform the operation.
    #[error("access denied: {0}")]
    Access(#[from] AccessDenied),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Recording history failed.
    #[error(transparent)]
    History(#[from] HistoryError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The entity the request names does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind.
        entity: EntityKind,
        /// The missing identifier.
        id: String,
    },
}

impl ServiceError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the access denial, if this is one.
    #[must_use]
    pub const fn as_denied(&self) -> Option<&AccessDenied> {
        match self {
            Self::Access(denied) => Some(denied),
            _ => None,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
