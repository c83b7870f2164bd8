/// Tool for marking habits complete
///
/// This module implements the habit_complete MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{CompletionStats, HabitId};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_date_or_today;

/// Parameters for recording a completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteHabitParams {
    /// ID of the habit that was done
    pub habit_id: HabitId,
    /// Day of the completion (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Optional note about this completion
    pub note: Option<String>,
}

/// Response from recording a completion
#[derive(Debug, Serialize)]
pub struct CompleteHabitResponse {
    pub success: bool,
    pub total_completed: Option<u32>,
    pub streak_count: Option<u32>,
    pub message: String,
}

/// Record that a habit was done on a day. Completing the same day twice
/// counts once.
pub fn complete_habit<S: HabitStorage>(
    storage: &S,
    params: CompleteHabitParams,
) -> Result<CompleteHabitResponse, StorageError> {
    let date = parse_date_or_today(params.date.as_deref())?;

    let recorded = storage.mark_complete_with_note(params.habit_id, date, params.note.as_deref())?;
    let habit = if recorded {
        storage.get_habit(params.habit_id)?
    } else {
        None
    };

    let Some(habit) = habit else {
        return Ok(CompleteHabitResponse {
            success: false,
            total_completed: None,
            streak_count: None,
            message: format!("Habit {} not found", params.habit_id),
        });
    };

    let stats = CompletionStats {
        total_completed: habit.total_completed,
        streak_count: habit.streak_count,
        last_completed: Some(date),
    };

    Ok(CompleteHabitResponse {
        success: true,
        total_completed: Some(habit.total_completed),
        streak_count: Some(habit.streak_count),
        message: format!(
            "Marked '{}' complete for {}. {}",
            habit.name,
            date,
            stats.motivational_message()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, HabitFields};
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;

    fn setup() -> (SqliteStorage, HabitId) {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let habit_id = storage
            .create_habit(&HabitFields::new("Read 20 pages", "Study", start, Frequency(7)))
            .unwrap();
        (storage, habit_id)
    }

    fn complete_on(
        storage: &SqliteStorage,
        habit_id: HabitId,
        date: &str,
    ) -> CompleteHabitResponse {
        let params = CompleteHabitParams {
            habit_id,
            date: Some(date.to_string()),
            note: None,
        };
        complete_habit(storage, params).unwrap()
    }

    #[test]
    fn test_complete_updates_counters() {
        let (storage, habit_id) = setup();

        complete_on(&storage, habit_id, "2024-06-01");
        complete_on(&storage, habit_id, "2024-06-02");
        let response = complete_on(&storage, habit_id, "2024-06-03");

        assert!(response.success);
        assert_eq!(response.total_completed, Some(3));
        assert_eq!(response.streak_count, Some(3));
        assert!(response.message.contains("3 days in a row"));
    }

    #[test]
    fn test_complete_same_day_twice_counts_once() {
        let (storage, habit_id) = setup();

        complete_on(&storage, habit_id, "2024-06-01");
        let response = complete_on(&storage, habit_id, "2024-06-01");
        assert_eq!(response.total_completed, Some(1));
    }

    #[test]
    fn test_complete_missing_habit() {
        let (storage, _) = setup();
        let response = complete_on(&storage, HabitId(99), "2024-06-01");
        assert!(!response.success);
        assert!(response.total_completed.is_none());
    }

    #[test]
    fn test_complete_without_date_records_today() {
        let (storage, habit_id) = setup();
        let before = chrono::Local::now().date_naive();

        let params = CompleteHabitParams {
            habit_id,
            date: None,
            note: Some("on time".to_string()),
        };
        let response = complete_habit(&storage, params).unwrap();
        let after = chrono::Local::now().date_naive();

        assert!(response.success);
        let entries = storage.entries_for_habit(habit_id).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].date == before || entries[0].date == after);
        assert_eq!(entries[0].note.as_deref(), Some("on time"));
    }

    #[test]
    fn test_complete_rejects_bad_date() {
        let (storage, habit_id) = setup();
        let params = CompleteHabitParams {
            habit_id,
            date: Some("June 1st".to_string()),
            note: None,
        };
        assert!(complete_habit(&storage, params).is_err());
    }
}
