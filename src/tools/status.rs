/// Tool for toggling a habit between Pending and Done
///
/// This module implements the habit_set_status MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, HabitStatus};
use crate::storage::{HabitStorage, StorageError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetStatusParams {
    /// ID of the habit to change
    pub habit_id: HabitId,
    /// Pending or Done
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub success: bool,
    pub message: String,
}

/// Change only the status of a habit
pub fn set_habit_status<S: HabitStorage>(
    storage: &S,
    params: SetStatusParams,
) -> Result<SetStatusResponse, StorageError> {
    let status: HabitStatus = params.status.parse()?;

    if !storage.set_status(params.habit_id, status)? {
        return Ok(SetStatusResponse {
            success: false,
            message: format!("Habit {} not found", params.habit_id),
        });
    }

    Ok(SetStatusResponse {
        success: true,
        message: format!("Habit {} is now {}", params.habit_id, status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, HabitFields};
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;

    #[test]
    fn test_set_status_keeps_other_fields() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let fields = HabitFields::new("Pray", "Worship", start, Frequency(7)).with_notes("dawn");
        let habit_id = storage.create_habit(&fields).unwrap();

        let params = SetStatusParams {
            habit_id,
            status: "done".to_string(),
        };
        let response = set_habit_status(&storage, params).unwrap();
        assert!(response.success);
        assert!(response.message.ends_with("Done"));

        let habit = storage.get_habit(habit_id).unwrap().unwrap();
        assert_eq!(habit.status, HabitStatus::Done);
        assert_eq!(habit.notes, "dawn");
    }

    #[test]
    fn test_set_status_rejects_unknown_value() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let params = SetStatusParams {
            habit_id: HabitId(1),
            status: "paused".to_string(),
        };

        let err = set_habit_status(&storage, params).unwrap_err();
        assert!(err.is_validation_failure());
    }
}
