/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. The habit's completion
/// log goes with it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::{HabitStorage, StorageError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: HabitId,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a habit and its history
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, StorageError> {
    let name = storage.get_habit(params.habit_id)?.map(|h| h.name);
    let deleted = storage.delete_habit(params.habit_id)?;

    let message = match (deleted, name) {
        (true, Some(name)) => format!("Deleted habit '{}' and its history", name),
        (true, None) => format!("Deleted habit {}", params.habit_id),
        (false, _) => format!("Habit {} not found", params.habit_id),
    };

    Ok(DeleteHabitResponse {
        success: deleted,
        message,
    })
}
