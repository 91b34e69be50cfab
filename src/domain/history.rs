//! Audit history records stored on tasks.

use super::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a field-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// An element was added to a collection.
    Add,
    /// An element was removed from a collection.
    Remove,
    /// A scalar value was replaced.
    Replace,
}

impl OperationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

/// A single field-level change inside a history entry.
///
/// `path` names the field (`/title`, `/assistant_actors`, ...). For
/// [`OperationKind::Add`] only `new_value` is set, for
/// [`OperationKind::Remove`] only `old_value`, and [`OperationKind::Replace`]
/// carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// What kind of change this is.
    pub kind: OperationKind,
    /// Stable label of the changed field.
    pub path: String,
    /// Value before the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    /// Value after the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl Operation {
    /// Creates a replace operation.
    #[must_use]
    pub fn replace(path: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            kind: OperationKind::Replace,
            path: path.into(),
            old_value: Some(old_value),
            new_value: Some(new_value),
        }
    }

    /// Creates an add operation for a collection element.
    #[must_use]
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            kind: OperationKind::Add,
            path: path.into(),
            old_value: None,
            new_value: Some(value),
        }
    }

    /// Creates a remove operation for a collection element.
    #[must_use]
    pub fn remove(path: impl Into<String>, value: Value) -> Self {
        Self {
            kind: OperationKind::Remove,
            path: path.into(),
            old_value: Some(value),
            new_value: None,
        }
    }
}

/// One append-only audit record: who changed what, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the change was made.
    pub changed_at: DateTime<Utc>,
    /// Who made the change.
    pub changed_by: ActorId,
    /// Optional short note supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional longer note supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field-level changes, in field declaration order.
    pub operations: Vec<Operation>,
}

impl HistoryEntry {
    /// Creates an entry without notes.
    #[must_use]
    pub const fn new(
        changed_by: ActorId,
        changed_at: DateTime<Utc>,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            changed_at,
            changed_by,
            title: None,
            description: None,
            operations,
        }
    }

    /// Returns `true` when the entry records no field changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
