//! Error types for domain value validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The actor login is empty after trimming.
    #[error("actor login must not be empty")]
    EmptyLogin,

    /// The actor login contains whitespace.
    #[error("actor login '{0}' must not contain whitespace")]
    InvalidLogin(String),

    /// A title is empty after trimming.
    #[error("{entity} title must not be empty")]
    EmptyTitle {
        /// The entity kind whose title was rejected.
        entity: &'static str,
    },

    /// The planned finish precedes the planned start.
    #[error("planned finish must not precede planned start")]
    InvalidSchedule,
}

/// Error returned while parsing roles from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing task statuses from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
