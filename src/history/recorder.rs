//! Building history entries for approved updates.

use super::{AuditConfig, Diffable, HistoryError};
use crate::domain::{ActorId, HistoryEntry};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Optional caller-supplied note attached to a history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryNote {
    title: Option<String>,
    description: Option<String>,
}

impl HistoryNote {
    /// Creates an empty note.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the note description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the note title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the note description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Turns an approved update into a history entry.
#[derive(Debug, Clone, Default)]
pub struct AuditRecorder {
    config: AuditConfig,
}

impl AuditRecorder {
    /// Creates a recorder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder with custom configuration.
    #[must_use]
    pub const fn with_config(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Diffs two snapshots and wraps the result in an entry stamped with the
    /// clock's current time.
    ///
    /// Returns `Ok(None)` when nothing changed and the configuration does
    /// not record empty entries.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoteTooLong`] when the note exceeds the
    /// configured limits.
    pub fn record<T: Diffable>(
        &self,
        old: &T,
        new: &T,
        author: ActorId,
        note: Option<&HistoryNote>,
        clock: &impl Clock,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        self.record_at(old, new, author, note, clock.utc())
    }

    /// Like [`AuditRecorder::record`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoteTooLong`] when the note exceeds the
    /// configured limits.
    pub fn record_at<T: Diffable>(
        &self,
        old: &T,
        new: &T,
        author: ActorId,
        note: Option<&HistoryNote>,
        changed_at: DateTime<Utc>,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        if let Some(note) = note {
            self.check_note(note)?;
        }

        let operations = old.diff(new);
        if operations.is_empty() && !self.config.record_empty_entries {
            return Ok(None);
        }

        let mut entry = HistoryEntry::new(author, changed_at, operations);
        if let Some(note) = note {
            entry.title = note.title.clone();
            entry.description = note.description.clone();
        }
        Ok(Some(entry))
    }

    fn check_note(&self, note: &HistoryNote) -> Result<(), HistoryError> {
        check_length("title", note.title(), self.config.max_note_title_chars)?;
        check_length(
            "description",
            note.description(),
            self.config.max_note_description_chars,
        )
    }
}

fn check_length(field: &'static str, value: Option<&str>, max: usize) -> Result<(), HistoryError> {
    let actual = value.map_or(0, |text| text.chars().count());
    if actual > max {
        return Err(HistoryError::NoteTooLong { field, max, actual });
    }
    Ok(())
}
