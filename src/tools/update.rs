/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool. Omitted parameters keep
/// their current value; the merged field set is then written as a full
/// replace.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{HabitFields, HabitId, HabitStatus, Priority};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::{parse_date, parse_frequency, parse_optional};

/// Parameters for updating an existing habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: HabitId,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Times per week, 1-7
    pub frequency: Option<u32>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    /// Pending or Done
    pub status: Option<String>,
    /// Low, Medium or High
    pub priority: Option<String>,
    pub notes: Option<String>,
    pub target_weekly: Option<u32>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
///
/// Arguments are parsed first; the merge over the stored fields then runs as
/// one atomic storage step.
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, StorageError> {
    let start_date = params.start_date.as_deref().map(parse_date).transpose()?;
    let frequency = params.frequency.map(parse_frequency).transpose()?;
    let status = parse_optional::<HabitStatus>(params.status.as_deref())?;
    let priority = parse_optional::<Priority>(params.priority.as_deref())?;
    let mut name = params.name;
    let mut category = params.category;
    let mut notes = params.notes;

    let mut merge = |fields: &mut HabitFields| {
        if let Some(name) = name.take() {
            fields.name = name;
        }
        if let Some(category) = category.take() {
            fields.category = category;
        }
        if let Some(notes) = notes.take() {
            fields.notes = notes;
        }
        if let Some(start_date) = start_date {
            fields.start_date = start_date;
        }
        if let Some(frequency) = frequency {
            fields.frequency = frequency;
        }
        if let Some(status) = status {
            fields.status = status;
        }
        if let Some(priority) = priority {
            fields.priority = priority;
        }
        if let Some(target_weekly) = params.target_weekly {
            fields.target_weekly = target_weekly;
        }
    };

    match storage.modify_habit(params.habit_id, &mut merge)? {
        Some(fields) => Ok(UpdateHabitResponse {
            success: true,
            message: format!("Updated habit '{}'", fields.name),
        }),
        None => Ok(not_found(params.habit_id)),
    }
}

fn not_found(habit_id: HabitId) -> UpdateHabitResponse {
    UpdateHabitResponse {
        success: false,
        message: format!("Habit {} not found", habit_id),
    }
}
