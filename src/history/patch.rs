//! Replaying recorded operations onto a snapshot.
//!
//! Replaying the output of [`super::Diffable::diff`] on the old snapshot
//! reconstructs the new one, which lets an audit trail be checked against
//! the stored state.

use super::{HistoryError, paths};
use crate::domain::{Operation, OperationKind, Task};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

/// Entities that recorded operations can be applied to.
pub trait Patchable {
    /// Applies one operation.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the path is unknown or immutable, the
    /// operation kind does not fit the field, or the value does not decode.
    fn apply(&mut self, operation: &Operation) -> Result<(), HistoryError>;

    /// Applies operations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`HistoryError`] raised by [`Patchable::apply`].
    fn apply_all<'a>(
        &mut self,
        operations: impl IntoIterator<Item = &'a Operation>,
    ) -> Result<(), HistoryError> {
        for operation in operations {
            self.apply(operation)?;
        }
        Ok(())
    }
}

impl Patchable for Task {
    fn apply(&mut self, operation: &Operation) -> Result<(), HistoryError> {
        use paths::task as p;

        match operation.path.as_str() {
            p::ID | p::CREATED_BY | p::CREATED_AT => {
                Err(HistoryError::ImmutablePath(operation.path.clone()))
            }
            p::PROJECT_ID => {
                self.set_project(replacement(operation)?);
                Ok(())
            }
            p::TITLE => {
                let title: String = replacement(operation)?;
                self.set_title(title)
                    .map_err(|err| HistoryError::invalid_value(p::TITLE, err.to_string()))
            }
            p::DESCRIPTION => {
                self.set_description(replacement(operation)?);
                Ok(())
            }
            p::STATUS => {
                self.restore_status(replacement(operation)?);
                Ok(())
            }
            p::STATUS_CHANGED_AT => {
                self.restore_status_changed_at(replacement(operation)?);
                Ok(())
            }
            p::RESPONSIBLE_ACTOR => {
                self.set_responsible_actor(replacement(operation)?);
                Ok(())
            }
            p::ASSISTANT_ACTORS => apply_to_set(self.assistant_actors_mut(), operation),
            p::OBSERVER_ACTORS => apply_to_set(self.observer_actors_mut(), operation),
            p::GEO_IDS => apply_to_set(self.geo_ids_mut(), operation),
            p::PLANNED_START_AT => {
                self.restore_planned_start_at(replacement(operation)?);
                Ok(())
            }
            p::PLANNED_FINISH_AT => {
                self.restore_planned_finish_at(replacement(operation)?);
                Ok(())
            }
            p::IS_ARCHIVED => {
                self.set_archived(replacement(operation)?);
                Ok(())
            }
            _ => Err(HistoryError::UnknownPath(operation.path.clone())),
        }
    }
}

/// Decodes the new value of a `Replace` operation.
fn replacement<T: DeserializeOwned>(operation: &Operation) -> Result<T, HistoryError> {
    if operation.kind != OperationKind::Replace {
        return Err(HistoryError::InvalidOperation {
            path: operation.path.clone(),
            kind: operation.kind.as_str(),
        });
    }
    decode(operation, operation.new_value.as_ref())
}

fn apply_to_set<T>(set: &mut BTreeSet<T>, operation: &Operation) -> Result<(), HistoryError>
where
    T: DeserializeOwned + Ord,
{
    match operation.kind {
        OperationKind::Add => {
            set.insert(decode(operation, operation.new_value.as_ref())?);
            Ok(())
        }
        OperationKind::Remove => {
            let element: T = decode(operation, operation.old_value.as_ref())?;
            set.remove(&element);
            Ok(())
        }
        OperationKind::Replace => Err(HistoryError::InvalidOperation {
            path: operation.path.clone(),
            kind: operation.kind.as_str(),
        }),
    }
}

fn decode<T: DeserializeOwned>(
    operation: &Operation,
    value: Option<&Value>,
) -> Result<T, HistoryError> {
    let raw = value.ok_or_else(|| HistoryError::MissingValue(operation.path.clone()))?;
    serde_json::from_value(raw.clone())
        .map_err(|err| HistoryError::invalid_value(operation.path.as_str(), err.to_string()))
}
