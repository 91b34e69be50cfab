//! Actor identity records.

use super::{ActorId, DomainError, Role};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An identity that acts on projects, geos and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    login: String,
    name: String,
    role: Role,
    is_archived: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedActorData {
    /// Persisted actor identifier.
    pub id: ActorId,
    /// Persisted login.
    pub login: String,
    /// Persisted display name.
    pub name: String,
    /// Persisted global role.
    pub role: Role,
    /// Persisted archive flag.
    pub is_archived: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Actor {
    /// Creates a new, active actor.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyLogin`] or [`DomainError::InvalidLogin`]
    /// when the login is blank or contains whitespace.
    pub fn new(
        login: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        clock: &impl Clock,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: ActorId::new(),
            login: normalize_login(login.into())?,
            name: name.into().trim().to_owned(),
            role,
            is_archived: false,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an actor from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActorData) -> Self {
        Self {
            id: data.id,
            login: data.login,
            name: data.name,
            role: data.role,
            is_archived: data.is_archived,
            created_at: data.created_at,
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the global role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` when the actor has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the login.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyLogin`] or [`DomainError::InvalidLogin`]
    /// when the login is blank or contains whitespace.
    pub fn set_login(&mut self, login: impl Into<String>) -> Result<(), DomainError> {
        self.login = normalize_login(login.into())?;
        Ok(())
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_owned();
    }

    /// Replaces the global role.
    pub const fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Sets the archive flag.
    pub const fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }

    /// Returns a copy of this actor with only the archive flag set.
    #[must_use]
    pub fn archived(&self) -> Self {
        let mut copy = self.clone();
        copy.is_archived = true;
        copy
    }
}

fn normalize_login(raw: String) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyLogin);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidLogin(raw));
    }
    Ok(trimmed.to_owned())
}
