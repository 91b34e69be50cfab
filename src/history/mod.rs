//! Change-diff engine and audit history.
//!
//! An approved update is turned into a [`HistoryEntry`] by diffing the old
//! and new snapshots with [`Diffable`] and wrapping the operations with
//! [`AuditRecorder`]. Entries are appended to a task's history and never
//! rewritten. [`Patchable`] replays recorded operations.

mod config;
mod diff;
mod error;
pub mod paths;
mod patch;
mod recorder;

pub use crate::domain::{HistoryEntry, Operation, OperationKind};
pub use config::AuditConfig;
pub use diff::{DiffBuilder, Diffable};
pub use error::HistoryError;
pub use patch::Patchable;
pub use recorder::{AuditRecorder, HistoryNote};
