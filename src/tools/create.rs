/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{HabitFields, HabitId, HabitStatus, Priority};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::{parse_date_or_today, parse_frequency, parse_optional};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Unique name of the habit (1-100 characters)
    pub name: String,
    /// Category name, e.g. Health, Study, Sport
    pub category: String,
    /// Times per week, 1-7
    pub frequency: u32,
    /// First day of the habit (YYYY-MM-DD), defaults to today
    pub start_date: Option<String>,
    /// Pending or Done, defaults to Pending
    pub status: Option<String>,
    /// Low, Medium or High, defaults to Medium
    pub priority: Option<String>,
    /// Free-form notes (up to 500 characters)
    pub notes: Option<String>,
    /// Completions aimed for per week, defaults to 1
    pub target_weekly: Option<u32>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: Option<HabitId>,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, StorageError> {
    let start_date = parse_date_or_today(params.start_date.as_deref())?;
    let frequency = parse_frequency(params.frequency)?;

    let mut fields = HabitFields::new(params.name, params.category, start_date, frequency)
        .with_status(parse_optional::<HabitStatus>(params.status.as_deref())?.unwrap_or_default())
        .with_priority(parse_optional::<Priority>(params.priority.as_deref())?.unwrap_or_default())
        .with_notes(params.notes.unwrap_or_default());
    if let Some(target_weekly) = params.target_weekly {
        fields = fields.with_target_weekly(target_weekly);
    }

    let habit_id = storage.create_habit(&fields)?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id: Some(habit_id),
        message: format!(
            "Created habit '{}' in {} ({}x per week). Ready to start your streak!",
            fields.name,
            fields.category,
            fields.frequency.times_per_week()
        ),
    })
}
