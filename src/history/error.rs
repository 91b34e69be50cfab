//! Error types for audit recording and history replay.

use thiserror::Error;

/// Errors raised while recording or replaying history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// The operation path does not name a known field.
    #[error("unknown history path: {0}")]
    UnknownPath(String),

    /// The path names a field that never changes after creation.
    #[error("history path {0} names an immutable field")]
    ImmutablePath(String),

    /// The operation kind does not apply to the field.
    #[error("operation {kind} is not valid for path {path}")]
    InvalidOperation {
        /// The field path.
        path: String,
        /// The rejected operation kind.
        kind: &'static str,
    },

    /// The operation lacks the value it needs.
    #[error("operation on {0} carries no value")]
    MissingValue(String),

    /// The operation value does not decode into the field type.
    #[error("invalid value for {path}: {reason}")]
    InvalidValue {
        /// The field path.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// A caller-supplied note exceeds the configured limit.
    #[error("history note {field} has {actual} characters, exceeds limit of {max}")]
    NoteTooLong {
        /// Which note field was too long.
        field: &'static str,
        /// The configured limit.
        max: usize,
        /// The actual length.
        actual: usize,
    },
}

impl HistoryError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
