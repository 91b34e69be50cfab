//! Task status values and the workflow table for unprivileged actors.
//!
//! Admins and managers may move a task between any two statuses. Everybody
//! else is limited to the request transitions encoded in
//! [`TaskStatus::permits_requested_transition`]: they can ask for a task to
//! be finished or cancelled, pick it up again, or reset it, but they can
//! never land it in [`TaskStatus::Finished`] or [`TaskStatus::Canceled`]
//! themselves.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and nobody has started on it.
    New,
    /// Task is being worked on.
    InWork,
    /// A participant asked for the task to be closed as done.
    FinishRequested,
    /// A participant asked for the task to be closed as cancelled.
    CancelRequested,
    /// Task was closed as done.
    Finished,
    /// Task was closed as cancelled.
    Canceled,
}

impl TaskStatus {
    /// All statuses, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::InWork,
        Self::FinishRequested,
        Self::CancelRequested,
        Self::Finished,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InWork => "in_work",
            Self::FinishRequested => "finish_requested",
            Self::CancelRequested => "cancel_requested",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
        }
    }

    /// Returns `true` for statuses that close a task.
    ///
    /// Informational only: no rule forbids leaving a closed status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Canceled)
    }

    /// Returns `true` when an actor without Admin or Manager standing may
    /// move a task from `self` to `target`.
    ///
    /// Keeping the current status is always permitted.
    #[must_use]
    pub const fn permits_requested_transition(self, target: Self) -> bool {
        if self as u8 == target as u8 {
            return true;
        }
        match target {
            Self::FinishRequested => {
                matches!(self, Self::New | Self::InWork | Self::CancelRequested)
            }
            Self::CancelRequested => {
                matches!(self, Self::New | Self::InWork | Self::FinishRequested)
            }
            Self::InWork => matches!(
                self,
                Self::New | Self::FinishRequested | Self::CancelRequested
            ),
            Self::New => matches!(
                self,
                Self::InWork | Self::FinishRequested | Self::CancelRequested
            ),
            Self::Finished | Self::Canceled => false,
        }
    }

    /// Returns the statuses reachable from `self` by an unprivileged actor,
    /// excluding `self`.
    #[must_use]
    pub fn requested_targets(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| *target != self && self.permits_requested_transition(*target))
            .collect()
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "in_work" => Ok(Self::InWork),
            "finish_requested" => Ok(Self::FinishRequested),
            "cancel_requested" => Ok(Self::CancelRequested),
            "finished" => Ok(Self::Finished),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
