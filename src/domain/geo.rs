//! Geospatial regions attached to a project.
//!
//! The geometry itself lives in the document store and is searched there;
//! the domain only tracks ownership and lifecycle.

use super::{ActorId, DomainError, GeoId, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A geospatial region owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    id: GeoId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    is_archived: bool,
    created_by: ActorId,
    created_at: DateTime<Utc>,
}

impl Geo {
    /// Creates a new geo in a project.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        created_by: ActorId,
        clock: &impl Clock,
    ) -> Result<Self, DomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTitle { entity: "geo" });
        }
        Ok(Self {
            id: GeoId::new(),
            project_id,
            title: trimmed.to_owned(),
            description: None,
            is_archived: false,
            created_by,
            created_at: clock.utc(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the geo identifier.
    #[must_use]
    pub const fn id(&self) -> GeoId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
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

    /// Returns `true` when the geo has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the creating actor.
    #[must_use]
    pub const fn created_by(&self) -> ActorId {
        self.created_by
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
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTitle { entity: "geo" });
        }
        trimmed.clone_into(&mut self.title);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Moves the geo to another project.
    ///
    /// The update rules reject any snapshot produced this way; the setter
    /// exists so a requested move can be evaluated and refused.
    pub const fn set_project(&mut self, project_id: ProjectId) {
        self.project_id = project_id;
    }

    /// Sets the archive flag.
    pub const fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }

    /// Returns a copy of this geo with only the archive flag set.
    #[must_use]
    pub fn archived(&self) -> Self {
        let mut copy = self.clone();
        copy.is_archived = true;
        copy
    }
}
