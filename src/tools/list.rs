/// Tool for listing habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitFilter, HabitId, HabitStatus, Priority};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_optional;

/// Parameters for listing habits. Every parameter is optional and they
/// combine with AND.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Exact category name
    pub category: Option<String>,
    /// Pending or Done
    pub status: Option<String>,
    /// Low, Medium or High
    pub priority: Option<String>,
    /// Text to look for in the name or notes
    pub search: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: HabitId,
    pub name: String,
    pub category: String,
    pub status: HabitStatus,
    pub priority: Priority,
    pub frequency: u8,
    pub streak_count: u32,
    pub total_completed: u32,
    pub weekly_progress: f64,
}

impl From<Habit> for HabitSummary {
    fn from(habit: Habit) -> Self {
        Self {
            habit_id: habit.id,
            weekly_progress: habit.weekly_progress(),
            frequency: habit.frequency.times_per_week(),
            name: habit.name,
            category: habit.category,
            status: habit.status,
            priority: habit.priority,
            streak_count: habit.streak_count,
            total_completed: habit.total_completed,
        }
    }
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub message: String,
}

/// List habits using the provided storage, newest first
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, StorageError> {
    let filter = HabitFilter {
        category: params.category,
        status: parse_optional(params.status.as_deref())?,
        priority: parse_optional(params.priority.as_deref())?,
        search: params.search,
    };

    let habits: Vec<HabitSummary> = storage
        .list_habits(&filter)?
        .into_iter()
        .map(HabitSummary::from)
        .collect();

    let message = if habits.is_empty() {
        if filter.is_empty() {
            "No habits found. Create your first habit to get started!".to_string()
        } else {
            "No habits match the filter.".to_string()
        }
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                format!(
                    "[{}] {} ({}, {})\n   Status: {} | Frequency: {}x/week | Streak: {} days | Total: {} | Weekly progress: {:.0}%",
                    h.habit_id,
                    h.name,
                    h.category,
                    h.priority,
                    h.status,
                    h.frequency,
                    h.streak_count,
                    h.total_completed,
                    h.weekly_progress
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("Habits ({}):\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
