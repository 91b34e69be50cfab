//! Project aggregate and its per-actor role overrides.

use super::{ActorId, DomainError, GeoId, ProjectId, Role};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A project groups tasks and geos and carries project-scoped roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: Option<String>,
    project_actor_roles: BTreeMap<ActorId, Role>,
    layers: BTreeSet<GeoId>,
    is_archived: bool,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates an empty project.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, clock: &impl Clock) -> Result<Self, DomainError> {
        Ok(Self {
            id: ProjectId::new(),
            title: normalize_title(title.into())?,
            description: None,
            project_actor_roles: BTreeMap::new(),
            layers: BTreeSet::new(),
            is_archived: false,
            created_at: clock.utc(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a project role override.
    #[must_use]
    pub fn with_member(mut self, actor_id: ActorId, role: Role) -> Self {
        self.project_actor_roles.insert(actor_id, role);
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns every project role override.
    #[must_use]
    pub const fn project_actor_roles(&self) -> &BTreeMap<ActorId, Role> {
        &self.project_actor_roles
    }

    /// Returns the project role override for an actor, if any.
    #[must_use]
    pub fn role_of(&self, actor_id: ActorId) -> Option<Role> {
        self.project_actor_roles.get(&actor_id).copied()
    }

    /// Returns the geo layers attached to the project.
    #[must_use]
    pub const fn layers(&self) -> &BTreeSet<GeoId> {
        &self.layers
    }

    /// Returns `true` when the project has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the title is blank.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        self.title = normalize_title(title.into())?;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Assigns or replaces the project role of an actor.
    pub fn assign_role(&mut self, actor_id: ActorId, role: Role) {
        self.project_actor_roles.insert(actor_id, role);
    }

    /// Removes an actor's project role. Returns `true` if one was present.
    pub fn remove_member(&mut self, actor_id: ActorId) -> bool {
        self.project_actor_roles.remove(&actor_id).is_some()
    }

    /// Attaches a geo layer. Returns `true` if it was not attached yet.
    pub fn add_layer(&mut self, geo_id: GeoId) -> bool {
        self.layers.insert(geo_id)
    }

    /// Detaches a geo layer. Returns `true` if it was attached.
    pub fn remove_layer(&mut self, geo_id: GeoId) -> bool {
        self.layers.remove(&geo_id)
    }

    /// Sets the archive flag.
    pub const fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }

    /// Returns a copy of this project with only the archive flag set.
    #[must_use]
    pub fn archived(&self) -> Self {
        let mut copy = self.clone();
        copy.is_archived = true;
        copy
    }
}

fn normalize_title(raw: String) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle { entity: "project" });
    }
    Ok(trimmed.to_owned())
}
