/// Database migration management
///
/// This module handles creating and updating the SQLite database schema and
/// seeding the category reference table. Running it against an already
/// initialized database is a no-op.

use rusqlite::{params, Connection};

use crate::domain::{Category, MAX_ENTRY_NOTE_LENGTH, MAX_NAME_LENGTH, MAX_NOTES_LENGTH};
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist, then
/// seeds the default categories.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "Database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    seed_categories(conn)?;

    Ok(())
}

/// Get the current database schema version (0 for a fresh database)
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get::<_, i32>(0),
    )?;

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: habits, completion log and categories
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS habits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
                    CHECK (length(trim(name)) > 0 AND length(name) <= {name_max}),
                category TEXT NOT NULL CHECK (length(trim(category)) > 0),
                start_date TEXT NOT NULL,
                frequency INTEGER NOT NULL CHECK (frequency >= 1 AND frequency <= 7),
                status TEXT NOT NULL DEFAULT 'Pending' CHECK (status IN ('Pending', 'Done')),
                notes TEXT NOT NULL DEFAULT '' CHECK (length(notes) <= {notes_max}),
                priority TEXT NOT NULL DEFAULT 'Medium'
                    CHECK (priority IN ('Low', 'Medium', 'High')),
                target_weekly INTEGER NOT NULL DEFAULT 1 CHECK (target_weekly >= 1),
                streak_count INTEGER NOT NULL DEFAULT 0,
                total_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            name_max = MAX_NAME_LENGTH,
            notes_max = MAX_NOTES_LENGTH,
        ),
        [],
    )?;

    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS completion_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                note TEXT CHECK (note IS NULL OR length(note) <= {note_max}),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (habit_id, date),
                FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
            )",
            note_max = MAX_ENTRY_NOTE_LENGTH,
        ),
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            icon TEXT
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Filter columns used by list_habits
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_category ON habits (category)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_status ON habits (status)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_priority ON habits (priority)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits (created_at)",
        [],
    )?;

    // (habit_id, date) lookups are covered by the UNIQUE constraint's index
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_completion_log_date ON completion_log (date)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}

/// Insert the default categories, leaving existing rows untouched
fn seed_categories(conn: &Connection) -> Result<(), StorageError> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO categories (name, color, icon) VALUES (?1, ?2, ?3)")?;

    let mut inserted = 0;
    for category in Category::defaults() {
        inserted += stmt.execute(params![category.name, category.color, category.icon])?;
    }

    if inserted > 0 {
        tracing::info!("Seeded {} default categories", inserted);
    }
    Ok(())
}
