/// Basic unit tests to verify core functionality
use daily_routine::*;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_habit_fields_creation() {
    let fields = HabitFields::new("Test Habit", "Health", date("2024-01-01"), Frequency(5))
        .with_priority(Priority::High)
        .with_notes("A test habit");

    assert!(fields.validate().is_ok());
    assert_eq!(fields.name, "Test Habit");
    assert_eq!(fields.status, HabitStatus::Pending);
}

#[test]
fn test_frequency_bounds() {
    assert!(Frequency::new(Frequency::MIN).is_ok());
    assert!(Frequency::new(Frequency::MAX).is_ok());
    assert!(Frequency::new(0).is_err());
    assert!(Frequency::new(8).is_err());
}

#[test]
fn test_status_and_priority_text_forms() {
    assert_eq!("DONE".parse::<HabitStatus>().unwrap(), HabitStatus::Done);
    assert_eq!(HabitStatus::Pending.to_string(), "Pending");
    assert_eq!(" high ".parse::<Priority>().unwrap(), Priority::High);
    assert!("urgent".parse::<Priority>().is_err());
}

#[test]
fn test_streak_policies_disagree_on_gaps() {
    let dates = [date("2024-02-27"), date("2024-02-28"), date("2024-03-01")];

    let consecutive = CompletionStats::from_completed_dates(&dates, StreakPolicy::Consecutive);
    assert_eq!(consecutive.total_completed, 3);
    assert_eq!(consecutive.streak_count, 1);
    assert_eq!(consecutive.last_completed, Some(date("2024-03-01")));

    let lifetime = CompletionStats::from_completed_dates(&dates, StreakPolicy::LifetimeCount);
    assert_eq!(lifetime.streak_count, 3);
}

#[test]
fn test_default_categories() {
    let categories = Category::defaults();
    assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    assert!(categories.iter().all(|c| c.color.starts_with('#')));
}

#[test]
fn test_entry_note_limit() {
    assert!(CompletionEntry::validate_note(None).is_ok());
    assert!(CompletionEntry::validate_note(Some("short")).is_ok());
    assert!(CompletionEntry::validate_note(Some(&"n".repeat(MAX_ENTRY_NOTE_LENGTH + 1))).is_err());
}

#[tokio::test]
async fn test_server_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = DailyRoutineServer::new(&StoreConfig::new(temp_file.path()));
    assert!(server.is_ok());
}

#[test]
fn test_analytics_engine_on_empty_statistics() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let stats = storage.statistics().unwrap();

    let insights = AnalyticsEngine::new().generate_insights(&stats, &[]);
    assert_eq!(insights.len(), 1);
}
