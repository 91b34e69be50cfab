//! Configuration for audit recording.

/// Settings that shape the history entries produced for updates.
///
/// # Examples
///
/// ```
/// use geotask::history::AuditConfig;
///
/// let config = AuditConfig::default();
/// assert!(!config.record_empty_entries);
///
/// let verbose = AuditConfig::verbose();
/// assert!(verbose.record_empty_entries);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Whether an update that changes nothing still appends an entry.
    pub record_empty_entries: bool,
    /// Maximum note title length in characters.
    pub max_note_title_chars: usize,
    /// Maximum note description length in characters.
    pub max_note_description_chars: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            record_empty_entries: false,
            max_note_title_chars: 200,
            max_note_description_chars: 4_000,
        }
    }
}

impl AuditConfig {
    /// Creates a configuration that records an entry for every approved
    /// update, even when no field changed.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            record_empty_entries: true,
            ..Default::default()
        }
    }
}
