/// Streak calculation for the derived habit counters
///
/// A habit carries two derived counters, `total_completed` and
/// `streak_count`. Both are recomputed from the completion log whenever a
/// completion is recorded; nothing else writes them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// How `streak_count` is derived from the completion log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakPolicy {
    /// Length of the run of consecutive days ending at the latest completion
    #[default]
    Consecutive,
    /// Same value as the lifetime completion count, for databases whose
    /// counters were written that way
    LifetimeCount,
}

impl fmt::Display for StreakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakPolicy::Consecutive => f.write_str("consecutive"),
            StreakPolicy::LifetimeCount => f.write_str("lifetime-count"),
        }
    }
}

impl FromStr for StreakPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consecutive" => Ok(StreakPolicy::Consecutive),
            "lifetime-count" | "lifetime_count" | "count" => Ok(StreakPolicy::LifetimeCount),
            other => Err(DomainError::InvalidValue {
                message: format!(
                    "Invalid streak policy '{}'. Valid options: consecutive, lifetime-count",
                    other
                ),
            }),
        }
    }
}

/// Recomputed counters for one habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionStats {
    pub total_completed: u32,
    pub streak_count: u32,
    pub last_completed: Option<NaiveDate>,
}

impl CompletionStats {
    /// Calculate counters from the dates of completed log entries
    ///
    /// `total_completed` is a lifetime count with no date-range restriction.
    pub fn from_completed_dates(dates: &[NaiveDate], policy: StreakPolicy) -> Self {
        let mut sorted = dates.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let total_completed = sorted.len() as u32;
        let streak_count = match policy {
            StreakPolicy::LifetimeCount => total_completed,
            StreakPolicy::Consecutive => Self::trailing_run(&sorted),
        };

        Self {
            total_completed,
            streak_count,
            last_completed: sorted.first().copied(),
        }
    }

    /// Count consecutive days backwards from the newest date
    ///
    /// `dates` must be sorted newest first without duplicates.
    fn trailing_run(dates: &[NaiveDate]) -> u32 {
        let Some(&newest) = dates.first() else {
            return 0;
        };

        let mut run = 1;
        let mut expected = newest;
        for date in &dates[1..] {
            match expected.pred_opt() {
                Some(previous) if *date == previous => {
                    run += 1;
                    expected = previous;
                }
                _ => break,
            }
        }
        run
    }

    /// Get a motivational message based on the current streak
    pub fn motivational_message(&self) -> String {
        match self.streak_count {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!(
                "Nice work! {} days in a row. You're building a strong habit.",
                self.streak_count
            ),
            7..=29 => format!(
                "Excellent! {} days strong. You're in the groove now!",
                self.streak_count
            ),
            _ => format!(
                "Incredible! {} days of consistency. You're a habit master!",
                self.streak_count
            ),
        }
    }
}
