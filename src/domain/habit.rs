/// Habit entity and related functionality
///
/// This module defines the Habit record as it is persisted, and HabitFields,
/// the caller-supplied input used by both create and the full-replace update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, HabitId, HabitStatus, Priority};

/// Longest accepted habit name
pub const MAX_NAME_LENGTH: usize = 100;
/// Longest accepted notes text
pub const MAX_NOTES_LENGTH: usize = 500;

/// A habit the user wants to do regularly
///
/// `streak_count` and `total_completed` are derived from the completion log
/// and only change when a completion is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub status: HabitStatus,
    pub priority: Priority,
    pub notes: String,
    pub target_weekly: u32,
    pub streak_count: u32,
    pub total_completed: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Progress towards the weekly target as a percentage, capped at 100
    pub fn weekly_progress(&self) -> f64 {
        if self.target_weekly == 0 {
            return 0.0;
        }
        let progress = self.total_completed as f64 / self.target_weekly as f64 * 100.0;
        progress.min(100.0)
    }

    /// The mutable fields of this habit, e.g. to tweak one field and update
    pub fn to_fields(&self) -> HabitFields {
        HabitFields {
            name: self.name.clone(),
            category: self.category.clone(),
            start_date: self.start_date,
            frequency: self.frequency,
            status: self.status,
            priority: self.priority,
            notes: self.notes.clone(),
            target_weekly: self.target_weekly,
        }
    }
}

/// Caller-supplied fields of a habit
///
/// Create and update both take a complete set of fields: update is a full
/// replace, not a partial patch. Derived counters are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitFields {
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub status: HabitStatus,
    pub priority: Priority,
    pub notes: String,
    pub target_weekly: u32,
}

impl HabitFields {
    /// Required fields; status, priority, notes and weekly target take their
    /// defaults (Pending, Medium, empty, 1)
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            start_date,
            frequency,
            status: HabitStatus::default(),
            priority: Priority::default(),
            notes: String::new(),
            target_weekly: 1,
        }
    }

    pub fn with_status(mut self, status: HabitStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_target_weekly(mut self, target_weekly: u32) -> Self {
        self.target_weekly = target_weekly;
        self
    }

    /// Check the same rules the schema enforces, so callers get a precise
    /// message instead of a raw constraint failure
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_name(&self.name)?;
        self.frequency.validate()?;

        if self.category.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Category cannot be empty".to_string(),
            });
        }

        if self.notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(DomainError::Validation {
                message: format!("Notes cannot be longer than {} characters", MAX_NOTES_LENGTH),
            });
        }

        if self.target_weekly == 0 {
            return Err(DomainError::InvalidValue {
                message: "Weekly target must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_NAME_LENGTH
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_fields_defaults() {
        let fields = HabitFields::new("Morning Run", "Sport", date("2024-01-01"), Frequency(3));

        assert_eq!(fields.status, HabitStatus::Pending);
        assert_eq!(fields.priority, Priority::Medium);
        assert_eq!(fields.notes, "");
        assert_eq!(fields.target_weekly, 1);
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn test_invalid_habit_name() {
        let empty = HabitFields::new("   ", "Health", date("2024-01-01"), Frequency(1));
        assert!(matches!(empty.validate(), Err(DomainError::InvalidHabitName(_))));

        let long = HabitFields::new("x".repeat(101), "Health", date("2024-01-01"), Frequency(1));
        assert!(long.validate().is_err());

        let exact = HabitFields::new("x".repeat(100), "Health", date("2024-01-01"), Frequency(1));
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_invalid_frequency_and_target() {
        let fields = HabitFields::new("Stretch", "Health", date("2024-01-01"), Frequency(9));
        assert!(matches!(fields.validate(), Err(DomainError::InvalidFrequency(_))));

        let fields = HabitFields::new("Stretch", "Health", date("2024-01-01"), Frequency(2))
            .with_target_weekly(0);
        assert!(fields.validate().is_err());

        let fields = HabitFields::new("Stretch", "Health", date("2024-01-01"), Frequency(2))
            .with_notes("n".repeat(501));
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_weekly_progress_is_capped() {
        let now = Utc::now();
        let mut habit = Habit {
            id: HabitId(1),
            name: "Read".to_string(),
            category: "Study".to_string(),
            start_date: date("2024-01-01"),
            frequency: Frequency(3),
            status: HabitStatus::Pending,
            priority: Priority::Low,
            notes: String::new(),
            target_weekly: 4,
            streak_count: 0,
            total_completed: 1,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(habit.weekly_progress(), 25.0);

        habit.total_completed = 9;
        assert_eq!(habit.weekly_progress(), 100.0);
        assert_eq!(habit.to_fields().target_weekly, 4);
    }
}
