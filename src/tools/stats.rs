/// Tool for habit statistics and insights
///
/// This module implements the habit_stats MCP tool that summarizes all habits
/// and adds a few observations from the analytics engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, HabitStatistics};
use crate::domain::HabitFilter;
use crate::storage::{HabitStorage, StorageError};

/// The statistics tool takes no parameters
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatsParams {}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub statistics: HabitStatistics,
    pub insights: Vec<String>,
    pub message: String,
}

/// Aggregate counts across all habits
pub fn habit_stats<S: HabitStorage>(
    storage: &S,
    _params: StatsParams,
) -> Result<StatsResponse, StorageError> {
    let statistics = storage.statistics()?;
    let habits = storage.list_habits(&HabitFilter::new())?;
    let insights = AnalyticsEngine::new().generate_insights(&statistics, &habits);

    let mut message = format!(
        "Total habits: {} | Done: {} | Pending: {} | Completion rate: {:.1}%",
        statistics.total_habits,
        statistics.done_habits,
        statistics.pending_habits,
        statistics.completion_rate
    );
    if !statistics.category_breakdown.is_empty() {
        let categories = statistics
            .category_breakdown
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!("\nBy category: {}", categories));
    }
    let priorities = statistics
        .priority_breakdown
        .iter()
        .map(|(priority, count)| format!("{}: {}", priority, count))
        .collect::<Vec<_>>()
        .join(", ");
    message.push_str(&format!("\nBy priority: {}", priorities));
    for insight in &insights {
        message.push_str(&format!("\n- {}", insight));
    }

    Ok(StatsResponse {
        statistics,
        insights,
        message,
    })
}
