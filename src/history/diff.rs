//! Structural diffs between two snapshots of the same entity.
//!
//! Scalars produce one `Replace` when they differ. Sets produce one
//! `Remove` per dropped element followed by one `Add` per new element.
//! Maps produce `Remove`, then `Add`, then `Replace` operations addressed by
//! key. Fields are visited in declaration order and collections iterate in
//! key order, so identical inputs always yield identical operations.

use super::paths;
use crate::domain::{Actor, Geo, Operation, Project, Task};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Entities that can describe how a newer snapshot differs from themselves.
pub trait Diffable {
    /// Returns the ordered operations that turn `self` into `new`.
    fn diff(&self, new: &Self) -> Vec<Operation>;
}

/// Accumulates operations field by field.
#[derive(Debug, Default)]
pub struct DiffBuilder {
    operations: Vec<Operation>,
}

impl DiffBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares a scalar field.
    #[must_use]
    pub fn scalar<T>(mut self, path: &str, old: &T, new: &T) -> Self
    where
        T: Serialize + PartialEq,
    {
        if old != new {
            self.operations
                .push(Operation::replace(path, to_json(old), to_json(new)));
        }
        self
    }

    /// Compares a set-valued field.
    #[must_use]
    pub fn set<T>(mut self, path: &str, old: &BTreeSet<T>, new: &BTreeSet<T>) -> Self
    where
        T: Serialize + Ord,
    {
        for removed in old.difference(new) {
            self.operations.push(Operation::remove(path, to_json(removed)));
        }
        for added in new.difference(old) {
            self.operations.push(Operation::add(path, to_json(added)));
        }
        self
    }

    /// Compares a map-valued field, addressing entries as `{path}/{key}`.
    #[must_use]
    pub fn map<K, V>(mut self, path: &str, old: &BTreeMap<K, V>, new: &BTreeMap<K, V>) -> Self
    where
        K: Serialize + Ord,
        V: Serialize + PartialEq,
    {
        for (key, value) in old.iter().filter(|(key, _)| !new.contains_key(*key)) {
            self.operations
                .push(Operation::remove(entry_path(path, key), to_json(value)));
        }
        for (key, value) in new.iter().filter(|(key, _)| !old.contains_key(*key)) {
            self.operations
                .push(Operation::add(entry_path(path, key), to_json(value)));
        }
        for (key, old_value) in old {
            if let Some(new_value) = new.get(key).filter(|value| *value != old_value) {
                self.operations.push(Operation::replace(
                    entry_path(path, key),
                    to_json(old_value),
                    to_json(new_value),
                ));
            }
        }
        self
    }

    /// Returns the accumulated operations.
    #[must_use]
    pub fn finish(self) -> Vec<Operation> {
        self.operations
    }
}

/// Serializes a field value for the audit log.
///
/// Domain values are plain data and always serialize; `Null` is recorded if
/// that ever stops holding.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn entry_path<K: Serialize>(path: &str, key: &K) -> String {
    match to_json(key) {
        Value::String(label) => format!("{path}/{label}"),
        other => format!("{path}/{other}"),
    }
}

impl Diffable for Task {
    fn diff(&self, new: &Self) -> Vec<Operation> {
        use paths::task as p;

        DiffBuilder::new()
            .scalar(p::ID, &self.id(), &new.id())
            .scalar(p::PROJECT_ID, &self.project_id(), &new.project_id())
            .scalar(p::TITLE, &self.title(), &new.title())
            .scalar(p::DESCRIPTION, &self.description(), &new.description())
            .scalar(p::STATUS, &self.status(), &new.status())
            .scalar(
                p::STATUS_CHANGED_AT,
                &self.status_changed_at(),
                &new.status_changed_at(),
            )
            .scalar(p::CREATED_BY, &self.created_by(), &new.created_by())
            .scalar(p::CREATED_AT, &self.created_at(), &new.created_at())
            .scalar(
                p::RESPONSIBLE_ACTOR,
                &self.responsible_actor(),
                &new.responsible_actor(),
            )
            .set(
                p::ASSISTANT_ACTORS,
                self.assistant_actors(),
                new.assistant_actors(),
            )
            .set(
                p::OBSERVER_ACTORS,
                self.observer_actors(),
                new.observer_actors(),
            )
            .set(p::GEO_IDS, self.geo_ids(), new.geo_ids())
            .scalar(
                p::PLANNED_START_AT,
                &self.planned_start_at(),
                &new.planned_start_at(),
            )
            .scalar(
                p::PLANNED_FINISH_AT,
                &self.planned_finish_at(),
                &new.planned_finish_at(),
            )
            .scalar(p::IS_ARCHIVED, &self.is_archived(), &new.is_archived())
            .finish()
    }
}

impl Diffable for Project {
    fn diff(&self, new: &Self) -> Vec<Operation> {
        use paths::project as p;

        DiffBuilder::new()
            .scalar(p::ID, &self.id(), &new.id())
            .scalar(p::TITLE, &self.title(), &new.title())
            .scalar(p::DESCRIPTION, &self.description(), &new.description())
            .map(
                p::PROJECT_ACTOR_ROLES,
                self.project_actor_roles(),
                new.project_actor_roles(),
            )
            .set(p::LAYERS, self.layers(), new.layers())
            .scalar(p::IS_ARCHIVED, &self.is_archived(), &new.is_archived())
            .scalar(p::CREATED_AT, &self.created_at(), &new.created_at())
            .finish()
    }
}

impl Diffable for Geo {
    fn diff(&self, new: &Self) -> Vec<Operation> {
        use paths::geo as p;

        DiffBuilder::new()
            .scalar(p::ID, &self.id(), &new.id())
            .scalar(p::PROJECT_ID, &self.project_id(), &new.project_id())
            .scalar(p::TITLE, &self.title(), &new.title())
            .scalar(p::DESCRIPTION, &self.description(), &new.description())
            .scalar(p::IS_ARCHIVED, &self.is_archived(), &new.is_archived())
            .scalar(p::CREATED_BY, &self.created_by(), &new.created_by())
            .scalar(p::CREATED_AT, &self.created_at(), &new.created_at())
            .finish()
    }
}

impl Diffable for Actor {
    fn diff(&self, new: &Self) -> Vec<Operation> {
        use paths::actor as p;

        DiffBuilder::new()
            .scalar(p::ID, &self.id(), &new.id())
            .scalar(p::LOGIN, &self.login(), &new.login())
            .scalar(p::NAME, &self.name(), &new.name())
            .scalar(p::ROLE, &self.role(), &new.role())
            .scalar(p::IS_ARCHIVED, &self.is_archived(), &new.is_archived())
            .scalar(p::CREATED_AT, &self.created_at(), &new.created_at())
            .finish()
    }
}
