/// Tool for showing one habit in detail
///
/// This module implements the habit_get MCP tool: the habit itself, its weekly
/// progress and its most recent completions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{CompletionEntry, Habit, HabitId};
use crate::storage::{HabitStorage, StorageError};

/// Completions shown when `recent` is not given
const DEFAULT_RECENT_ENTRIES: usize = 7;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetHabitParams {
    /// ID of the habit to show
    pub habit_id: HabitId,
    /// How many recent completions to include (default 7)
    pub recent: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GetHabitResponse {
    pub success: bool,
    pub habit: Option<Habit>,
    pub weekly_progress: Option<f64>,
    pub recent_entries: Vec<CompletionEntry>,
    pub message: String,
}

/// Look up a habit and its recent history
pub fn get_habit<S: HabitStorage>(
    storage: &S,
    params: GetHabitParams,
) -> Result<GetHabitResponse, StorageError> {
    let Some(habit) = storage.get_habit(params.habit_id)? else {
        return Ok(GetHabitResponse {
            success: false,
            habit: None,
            weekly_progress: None,
            recent_entries: Vec::new(),
            message: format!("Habit {} not found", params.habit_id),
        });
    };

    let mut recent_entries = storage.entries_for_habit(params.habit_id)?;
    recent_entries.truncate(params.recent.unwrap_or(DEFAULT_RECENT_ENTRIES));

    let weekly_progress = habit.weekly_progress();
    let mut message = format!(
        "{} ({}, {} priority, {})\n   Frequency: {}x per week | Streak: {} days | Total: {} | Weekly progress: {:.0}%",
        habit.name,
        habit.category,
        habit.priority,
        habit.status,
        habit.frequency.times_per_week(),
        habit.streak_count,
        habit.total_completed,
        weekly_progress
    );
    if !habit.notes.is_empty() {
        message.push_str(&format!("\n   Notes: {}", habit.notes));
    }
    for entry in &recent_entries {
        match entry.note.as_deref().filter(|_| entry.has_note()) {
            Some(note) => message.push_str(&format!("\n   - {} ({})", entry.date, note)),
            None => message.push_str(&format!("\n   - {}", entry.date)),
        }
    }

    Ok(GetHabitResponse {
        success: true,
        habit: Some(habit),
        weekly_progress: Some(weekly_progress),
        recent_entries,
        message,
    })
}
