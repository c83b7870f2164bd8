/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. The HabitStorage
/// trait is the habit store contract; SqliteStorage implements it.

pub mod migrations;
pub mod sqlite;
pub mod transaction;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics::HabitStatistics;
use crate::domain::{
    Category, CompletionEntry, DomainError, Habit, HabitFields, HabitFilter, HabitId, HabitStatus,
};

/// The local calendar date that "today" completions are recorded under
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Errors that can occur during storage operations
///
/// A missing habit is not an error: lookups return `Option` and mutations
/// return `false`.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// True when a uniqueness or range rule rejected the write; the caller
    /// should fix the input and retry. Everything else is a storage fault.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            StorageError::DuplicateName { .. }
                | StorageError::Constraint(_)
                | StorageError::Validation(_)
        )
    }
}

/// Trait defining the habit store operations
///
/// Implementations run every operation to completion before returning and
/// never retry; failures surface to the caller immediately.
pub trait HabitStorage {
    /// Insert a habit, returning its generated ID
    fn create_habit(&self, fields: &HabitFields) -> Result<HabitId, StorageError>;

    /// Replace all mutable fields of a habit. `Ok(false)` if it doesn't exist.
    fn update_habit(&self, habit_id: HabitId, fields: &HabitFields) -> Result<bool, StorageError>;

    /// Delete a habit and its completion log. `Ok(false)` if it doesn't exist.
    fn delete_habit(&self, habit_id: HabitId) -> Result<bool, StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>, StorageError>;

    /// List habits matching the filter, newest first
    fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, StorageError>;

    /// Record a completion for the given day and recompute derived counters.
    /// A `None` note keeps whatever note the entry already had.
    fn mark_complete_with_note(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<bool, StorageError>;

    /// Record a completion for the given day
    fn mark_complete(&self, habit_id: HabitId, date: NaiveDate) -> Result<bool, StorageError> {
        self.mark_complete_with_note(habit_id, date, None)
    }

    /// Record a completion for today (local calendar date)
    fn mark_complete_today(&self, habit_id: HabitId) -> Result<bool, StorageError> {
        self.mark_complete(habit_id, local_today())
    }

    /// Change only the status of a habit. `Ok(false)` if it doesn't exist.
    fn set_status(&self, habit_id: HabitId, status: HabitStatus) -> Result<bool, StorageError>;

    /// Read, edit and write back a habit's fields as one atomic step
    ///
    /// Returns the fields as written, or `None` if the habit doesn't exist.
    /// The edited fields are validated like an update.
    fn modify_habit(
        &self,
        habit_id: HabitId,
        edit: &mut dyn FnMut(&mut HabitFields),
    ) -> Result<Option<HabitFields>, StorageError>;

    /// Completion log of one habit, newest date first
    fn entries_for_habit(&self, habit_id: HabitId) -> Result<Vec<CompletionEntry>, StorageError>;

    /// Summary counts across all habits
    fn statistics(&self) -> Result<HabitStatistics, StorageError>;

    /// Reference categories ordered by name
    fn list_categories(&self) -> Result<Vec<Category>, StorageError>;
}
