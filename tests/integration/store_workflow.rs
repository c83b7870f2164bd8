/// End-to-end habit store workflows against a database file
use daily_routine::*;

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use tempfile::{tempdir, NamedTempFile};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn habit(name: &str, category: &str) -> HabitFields {
    HabitFields::new(name, category, date("2024-01-01"), Frequency(3))
}

fn file_storage() -> (NamedTempFile, SqliteStorage) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
    (temp_file, storage)
}

#[test]
fn test_completions_on_three_days() {
    let (_file, storage) = file_storage();
    let habit_id = storage
        .create_habit(&habit("Read 20 pages", "Study"))
        .unwrap();

    for day in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        assert!(storage.mark_complete(habit_id, date(day)).unwrap());
    }

    let read = storage.get_habit(habit_id).unwrap().unwrap();
    assert_eq!(read.total_completed, 3);
    assert_eq!(read.streak_count, 3);
    assert_eq!(storage.entries_for_habit(habit_id).unwrap().len(), 3);
}

#[test]
fn test_duplicate_gym_leaves_one_habit() {
    let (_file, storage) = file_storage();
    storage.create_habit(&habit("Gym", "Sport")).unwrap();

    let err = storage.create_habit(&habit("Gym", "Sport")).unwrap_err();
    assert!(err.is_validation_failure());

    let gyms = storage
        .list_habits(&HabitFilter::new().search("Gym"))
        .unwrap();
    assert_eq!(gyms.len(), 1);
}

#[test]
fn test_delete_removes_history() {
    let (_file, storage) = file_storage();
    let habit_id = storage.create_habit(&habit("Meditate", "Worship")).unwrap();
    storage.mark_complete(habit_id, date("2024-03-01")).unwrap();

    assert!(storage.delete_habit(habit_id).unwrap());
    assert!(storage.get_habit(habit_id).unwrap().is_none());
    assert!(storage.entries_for_habit(habit_id).unwrap().is_empty());
    assert!(!storage.mark_complete(habit_id, date("2024-03-02")).unwrap());
}

#[test]
fn test_list_filters_combine() {
    let (_file, storage) = file_storage();
    storage
        .create_habit(&habit("Vitamins", "Health").with_priority(Priority::High))
        .unwrap();
    storage.create_habit(&habit("Jog", "Sport")).unwrap();
    storage
        .create_habit(&habit("Sleep early", "Health").with_status(HabitStatus::Done))
        .unwrap();
    storage.create_habit(&habit("Stretch", "Health")).unwrap();

    let health = storage
        .list_habits(&HabitFilter::new().category("Health"))
        .unwrap();
    let names: Vec<_> = health.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Stretch", "Sleep early", "Vitamins"]);

    let pending_health = storage
        .list_habits(
            &HabitFilter::new()
                .category("Health")
                .status(HabitStatus::Pending),
        )
        .unwrap();
    assert_eq!(pending_health.len(), 2);

    let high = storage
        .list_habits(&HabitFilter::new().priority(Priority::High))
        .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].name, "Vitamins");

    // Empty strings impose no constraint
    let all = storage
        .list_habits(&HabitFilter::new().category("").search(""))
        .unwrap();
    assert_eq!(all.len(), 4);

    let filter = HabitFilter::new().category("Health").status(HabitStatus::Pending);
    for h in &all {
        assert_eq!(filter.matches(h), pending_health.iter().any(|p| p.id == h.id));
    }
}

#[test]
fn test_empty_store_statistics() {
    let (_file, storage) = file_storage();
    let stats = storage.statistics().unwrap();

    assert_eq!(stats.total_habits, 0);
    assert_eq!(stats.done_habits, 0);
    assert_eq!(stats.pending_habits, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert!(stats.category_breakdown.is_empty());
    assert!(stats.priority_breakdown.values().all(|&count| count == 0));
}

#[test]
fn test_set_status_then_statistics() {
    let (_file, storage) = file_storage();
    let a = storage.create_habit(&habit("Walk", "Health")).unwrap();
    storage.create_habit(&habit("Code", "Work")).unwrap();

    assert!(storage.set_status(a, HabitStatus::Done).unwrap());
    assert!(!storage.set_status(HabitId(999), HabitStatus::Done).unwrap());

    let stats = storage.statistics().unwrap();
    assert_eq!(stats.done_habits, 1);
    assert_eq!(stats.pending_habits, 1);
    assert_eq!(stats.completion_rate, 50.0);
}

#[test]
fn test_database_persistence() {
    let temp_dir = tempdir().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("nested").join("routine.db"))
        .with_streak_policy(StreakPolicy::LifetimeCount);

    let habit_id = {
        let server = DailyRoutineServer::new(&config).expect("Failed to create first server");
        let storage = server.storage();
        let id = storage.create_habit(&habit("Journal", "General")).unwrap();
        storage.mark_complete(id, date("2024-03-01")).unwrap();
        storage.mark_complete(id, date("2024-03-05")).unwrap();
        id
    };

    let server = DailyRoutineServer::new(&config).expect("Failed to create second server");
    let journal = server.storage().get_habit(habit_id).unwrap().unwrap();
    assert_eq!(journal.total_completed, 2);
    assert_eq!(journal.streak_count, 2);
    assert_eq!(server.storage().streak_policy(), StreakPolicy::LifetimeCount);
}

#[test]
fn test_concurrent_completions_are_all_counted() {
    let (_file, storage) = file_storage();
    let habit_id = storage.create_habit(&habit("Pushups", "Sport")).unwrap();
    let storage = Arc::new(storage);

    let handles: Vec<_> = (1..=10)
        .map(|day| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || {
                let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
                storage.mark_complete(habit_id, date).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let pushups = storage.get_habit(habit_id).unwrap().unwrap();
    assert_eq!(pushups.total_completed, 10);
    assert_eq!(pushups.streak_count, 10);
}

#[test]
fn test_storage_interface() {
    let (_file, storage) = file_storage();
    let dyn_storage: &dyn HabitStorage = &storage;
    assert_eq!(dyn_storage.list_categories().unwrap().len(), 8);
}
