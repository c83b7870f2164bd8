/// CompletionEntry entity for tracking habit completions
///
/// One row per (habit, calendar date). Marking a habit complete twice on the
/// same day updates the existing row instead of adding a second one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, EntryId, HabitId};

/// Longest accepted note on a single completion
pub const MAX_ENTRY_NOTE_LENGTH: usize = 500;

/// A record of a habit being done on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub id: EntryId,
    /// Owning habit; the entry is removed when the habit is deleted
    pub habit_id: HabitId,
    /// Which day this completion was for
    pub date: NaiveDate,
    pub completed: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompletionEntry {
    /// Check if this entry carries a non-blank note
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Validate an optional note before it is written
    pub fn validate_note(note: Option<&str>) -> Result<(), DomainError> {
        if let Some(text) = note {
            if text.chars().count() > MAX_ENTRY_NOTE_LENGTH {
                return Err(DomainError::InvalidValue {
                    message: format!(
                        "Notes cannot be longer than {} characters",
                        MAX_ENTRY_NOTE_LENGTH
                    ),
                });
            }
        }
        Ok(())
    }
}
