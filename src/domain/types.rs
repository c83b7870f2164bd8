/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier newtypes and the small value types
/// (frequency, status, priority) shared by Habit, CompletionEntry and the
/// storage layer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// A wrapper around the SQLite rowid so a habit ID can't be passed where an
/// entry ID is expected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct HabitId(pub i64);

impl HabitId {
    /// Raw integer value as stored in the database
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a completion log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

/// Target number of occurrences per week (1-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(pub u8);

impl Frequency {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    /// Build a frequency, rejecting values outside 1-7
    pub fn new(times_per_week: u8) -> Result<Self, DomainError> {
        let frequency = Self(times_per_week);
        frequency.validate()?;
        Ok(frequency)
    }

    /// Validate that a frequency value is within the weekly range
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0 < Self::MIN || self.0 > Self::MAX {
            return Err(DomainError::InvalidFrequency(format!(
                "Weekly frequency must be {}-{}, got {}",
                Self::MIN,
                Self::MAX,
                self.0
            )));
        }
        Ok(())
    }

    pub fn times_per_week(&self) -> u8 {
        self.0
    }
}

/// Coarse overall status of a habit, toggled by the user
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    JsonSchema,
)]
pub enum HabitStatus {
    #[default]
    Pending,
    Done,
}

impl HabitStatus {
    /// Label used in the database and in tool output
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Pending => "Pending",
            HabitStatus::Done => "Done",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(HabitStatus::Pending),
            "done" => Ok(HabitStatus::Done),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid status '{}'. Valid options: pending, done", other),
            }),
        }
    }
}

/// How important a habit is to the user
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    JsonSchema,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid priority '{}'. Valid options: low, medium, high", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_range() {
        assert!(Frequency::new(1).is_ok());
        assert!(Frequency::new(7).is_ok());
        assert!(Frequency::new(0).is_err());
        assert!(Frequency::new(8).is_err());
    }

    #[test]
    fn test_status_and_priority_labels() {
        assert_eq!("done".parse::<HabitStatus>().unwrap(), HabitStatus::Done);
        assert_eq!(" Pending ".parse::<HabitStatus>().unwrap(), HabitStatus::Pending);
        assert!("finished".parse::<HabitStatus>().is_err());

        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(HabitStatus::default().to_string(), "Pending");
    }
}
