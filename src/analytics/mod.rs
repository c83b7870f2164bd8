/// Aggregate statistics and insights over all habits
///
/// HabitStatistics is the summary returned by the store; AnalyticsEngine turns
/// it (plus the habit list) into short human-readable observations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Habit, HabitStatus, Priority};

/// Counts across all habits at the moment of the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStatistics {
    pub total_habits: u32,
    pub done_habits: u32,
    pub pending_habits: u32,
    /// Share of habits with status Done, as a percentage (0 when there are none)
    pub completion_rate: f64,
    pub category_breakdown: BTreeMap<String, u32>,
    /// Always holds every priority, zero when unused
    pub priority_breakdown: BTreeMap<Priority, u32>,
}

impl HabitStatistics {
    pub fn new(
        total_habits: u32,
        done_habits: u32,
        pending_habits: u32,
        category_breakdown: BTreeMap<String, u32>,
        priority_breakdown: BTreeMap<Priority, u32>,
    ) -> Self {
        Self {
            total_habits,
            done_habits,
            pending_habits,
            completion_rate: completion_rate(done_habits, total_habits),
            category_breakdown,
            priority_breakdown,
        }
    }

    /// Category with the most habits; ties go to the alphabetically first
    pub fn busiest_category(&self) -> Option<(&str, u32)> {
        self.category_breakdown
            .iter()
            .fold(None, |best: Option<(&str, u32)>, (name, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((name.as_str(), count)),
            })
    }
}

/// Percentage of `done` out of `total`, 0 for an empty store
pub fn completion_rate(done: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    done as f64 / total as f64 * 100.0
}

/// Analytics engine for processing habit data
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self {}
    }

    /// Generate insights about the current habit set
    pub fn generate_insights(&self, stats: &HabitStatistics, habits: &[Habit]) -> Vec<String> {
        let mut insights = Vec::new();

        if stats.total_habits == 0 {
            insights.push("Start by creating your first habit to track!".to_string());
            return insights;
        }

        insights.push(format!(
            "{} of {} habits are done ({:.0}%).",
            stats.done_habits, stats.total_habits, stats.completion_rate
        ));

        if let Some((category, count)) = stats.busiest_category() {
            insights.push(format!("Most of your habits are in {} ({}).", category, count));
        }

        if let Some(best) = habits
            .iter()
            .filter(|h| h.streak_count > 0)
            .max_by_key(|h| (h.streak_count, std::cmp::Reverse(h.id)))
        {
            insights.push(format!(
                "Longest streak: {} with {} days.",
                best.name, best.streak_count
            ));
        }

        let neglected = habits
            .iter()
            .filter(|h| h.status == HabitStatus::Pending && h.priority == Priority::High)
            .filter(|h| h.total_completed == 0)
            .count();
        if neglected > 0 {
            insights.push(format!(
                "{} high priority habit(s) have never been completed.",
                neglected
            ));
        }

        insights
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, HabitId};
    use chrono::{NaiveDate, Utc};

    fn habit(id: i64, name: &str, streak: u32, priority: Priority) -> Habit {
        let now = Utc::now();
        Habit {
            id: HabitId(id),
            name: name.to_string(),
            category: "Health".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            frequency: Frequency(3),
            status: HabitStatus::Pending,
            priority,
            notes: String::new(),
            target_weekly: 3,
            streak_count: streak,
            total_completed: streak,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 4), 25.0);
        assert_eq!(completion_rate(3, 3), 100.0);
    }

    #[test]
    fn test_busiest_category_tie_breaks_by_name() {
        let mut categories = BTreeMap::new();
        categories.insert("Sport".to_string(), 2);
        categories.insert("Health".to_string(), 2);
        categories.insert("Study".to_string(), 1);
        let stats = HabitStatistics::new(5, 0, 5, categories, BTreeMap::new());

        assert_eq!(stats.busiest_category(), Some(("Health", 2)));
    }

    #[test]
    fn test_insights_for_empty_store() {
        let stats = HabitStatistics::new(0, 0, 0, BTreeMap::new(), BTreeMap::new());
        let insights = AnalyticsEngine::new().generate_insights(&stats, &[]);

        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("first habit"));
    }

    #[test]
    fn test_insights_mention_longest_streak_and_neglected() {
        let habits = vec![
            habit(1, "Stretch", 4, Priority::Medium),
            habit(2, "Walk", 2, Priority::Low),
            habit(3, "Floss", 0, Priority::High),
        ];
        let mut categories = BTreeMap::new();
        categories.insert("Health".to_string(), 3);
        let stats = HabitStatistics::new(3, 0, 3, categories, BTreeMap::new());

        let insights = AnalyticsEngine::new().generate_insights(&stats, &habits);

        assert!(insights.iter().any(|i| i.contains("Stretch with 4 days")));
        assert!(insights.iter().any(|i| i.starts_with("1 high priority")));
        assert!(insights.iter().any(|i| i.contains("Health (3)")));
    }
}
