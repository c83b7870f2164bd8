/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior,
};

use crate::analytics::HabitStatistics;
use crate::config::StoreConfig;
use crate::domain::{
    Category, CompletionEntry, CompletionStats, EntryId, Frequency, Habit, HabitFields, HabitFilter,
    HabitId, HabitStatus, Predicate, Priority, StreakPolicy,
};
use crate::storage::transaction::execute_in_transaction;
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, category, start_date, frequency, status, priority, notes, \
     target_weekly, streak_count, total_completed, created_at, updated_at";

const ENTRY_COLUMNS: &str = "id, habit_id, date, completed, note, created_at, updated_at";

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex: one operation at a time, released on
/// every exit path when the guard drops.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    streak_policy: StreakPolicy,
}

impl SqliteStorage {
    /// Open (or create) the database file with the default streak policy
    ///
    /// This runs any necessary migrations to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn, StreakPolicy::default())?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open the database described by a configuration
    pub fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        Ok(Self::new(&config.database_path)?.with_streak_policy(config.streak_policy))
    }

    /// A private database that lives as long as this value
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn, StreakPolicy::default())
    }

    pub fn with_streak_policy(mut self, streak_policy: StreakPolicy) -> Self {
        self.streak_policy = streak_policy;
        self
    }

    pub fn streak_policy(&self) -> StreakPolicy {
        self.streak_policy
    }

    fn from_connection(
        conn: Connection,
        streak_policy: StreakPolicy,
    ) -> Result<Self, StorageError> {
        // Completion log rows rely on ON DELETE CASCADE
        conn.execute_batch("PRAGMA foreign_keys = ON").map_err(|e| {
            StorageError::Connection(format!("Failed to enable foreign keys: {}", e))
        })?;

        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            streak_policy,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database lock poisoned".to_string()))
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, fields: &HabitFields) -> Result<HabitId, StorageError> {
        fields.validate()?;

        let now = format_timestamp(Utc::now());
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO habits (
                name, category, start_date, frequency, status, priority, notes,
                target_weekly, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                fields.name,
                fields.category,
                fields.start_date.to_string(),
                fields.frequency.times_per_week(),
                fields.status.as_str(),
                fields.priority.as_str(),
                fields.notes,
                fields.target_weekly,
                now
            ],
        )
        .map_err(|e| map_write_error(e, &fields.name))?;

        let habit_id = HabitId(conn.last_insert_rowid());
        tracing::debug!("Created habit: {} ({})", fields.name, habit_id);
        Ok(habit_id)
    }

    fn update_habit(&self, habit_id: HabitId, fields: &HabitFields) -> Result<bool, StorageError> {
        fields.validate()?;

        let conn = self.lock()?;
        if write_fields(&conn, habit_id, fields)? == 0 {
            tracing::warn!("Habit {} not found for update", habit_id);
            return Ok(false);
        }

        tracing::debug!("Updated habit: {} ({})", fields.name, habit_id);
        Ok(true)
    }

    fn set_status(&self, habit_id: HabitId, status: HabitStatus) -> Result<bool, StorageError> {
        let now = format_timestamp(Utc::now());
        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE habits SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, habit_id.value()],
        )?;

        if rows_affected == 0 {
            tracing::warn!("Habit {} not found for status change", habit_id);
            return Ok(false);
        }

        tracing::debug!("Set habit {} status to {}", habit_id, status);
        Ok(true)
    }

    fn modify_habit(
        &self,
        habit_id: HabitId,
        edit: &mut dyn FnMut(&mut HabitFields),
    ) -> Result<Option<HabitFields>, StorageError> {
        let mut conn = self.lock()?;
        let written = execute_in_transaction(&mut conn, TransactionBehavior::Immediate, |tx| {
            let habit = tx
                .query_row(
                    &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                    params![habit_id.value()],
                    habit_from_row,
                )
                .optional()?;
            let Some(habit) = habit else {
                return Ok(None);
            };

            let mut fields = habit.to_fields();
            edit(&mut fields);
            fields.validate()?;
            write_fields(tx, habit_id, &fields)?;
            Ok(Some(fields))
        })?;

        match &written {
            Some(fields) => tracing::debug!("Modified habit: {} ({})", fields.name, habit_id),
            None => tracing::warn!("Habit {} not found for modification", habit_id),
        }
        Ok(written)
    }

    fn delete_habit(&self, habit_id: HabitId) -> Result<bool, StorageError> {
        let conn = self.lock()?;
        let rows_affected =
            conn.execute("DELETE FROM habits WHERE id = ?1", params![habit_id.value()])?;

        if rows_affected == 0 {
            tracing::warn!("Habit {} not found for deletion", habit_id);
            return Ok(false);
        }

        tracing::debug!("Deleted habit {} and its completion log", habit_id);
        Ok(true)
    }

    fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>, StorageError> {
        let conn = self.lock()?;
        let habit = conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.value()],
                habit_from_row,
            )
            .optional()?;

        Ok(habit)
    }

    fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, StorageError> {
        let (sql, values) = build_list_query(filter);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params_from_iter(values), habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn mark_complete_with_note(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<bool, StorageError> {
        CompletionEntry::validate_note(note)?;

        let policy = self.streak_policy;
        let mut conn = self.lock()?;
        let stats = execute_in_transaction(&mut conn, TransactionBehavior::Immediate, |tx| {
            let exists: bool = tx.query_row(
                "SELECT EXISTS (SELECT 1 FROM habits WHERE id = ?1)",
                params![habit_id.value()],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(None);
            }

            let now = format_timestamp(Utc::now());
            tx.execute(
                "INSERT INTO completion_log (habit_id, date, completed, note, created_at, updated_at)
                 VALUES (?1, ?2, 1, ?3, ?4, ?4)
                 ON CONFLICT (habit_id, date) DO UPDATE SET
                    completed = 1,
                    note = COALESCE(excluded.note, completion_log.note),
                    updated_at = excluded.updated_at",
                params![habit_id.value(), date.to_string(), note, now],
            )?;

            recompute_counters(tx, habit_id, policy, &now).map(Some)
        })?;

        match stats {
            Some(stats) => {
                tracing::debug!(
                    "Marked habit {} complete for {}: total {}, streak {}",
                    habit_id,
                    date,
                    stats.total_completed,
                    stats.streak_count
                );
                Ok(true)
            }
            None => {
                tracing::warn!("Habit {} not found for completion", habit_id);
                Ok(false)
            }
        }
    }

    fn entries_for_habit(&self, habit_id: HabitId) -> Result<Vec<CompletionEntry>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM completion_log WHERE habit_id = ?1 ORDER BY date DESC",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![habit_id.value()], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn statistics(&self) -> Result<HabitStatistics, StorageError> {
        let conn = self.lock()?;

        let (total, done, pending): (u32, u32, u32) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(status = 'Done'), 0),
                    COALESCE(SUM(status = 'Pending'), 0)
             FROM habits",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut category_breakdown = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT category, COUNT(*) FROM habits GROUP BY category")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;
        for row in rows {
            let (category, count) = row?;
            category_breakdown.insert(category, count);
        }

        let mut priority_breakdown: BTreeMap<Priority, u32> =
            [Priority::Low, Priority::Medium, Priority::High]
                .into_iter()
                .map(|p| (p, 0))
                .collect();
        let mut stmt = conn.prepare("SELECT priority, COUNT(*) FROM habits GROUP BY priority")?;
        let rows = stmt.query_map([], |row| {
            let priority = parse_column::<Priority>(row, 0)?;
            Ok((priority, row.get::<_, u32>(1)?))
        })?;
        for row in rows {
            let (priority, count) = row?;
            priority_breakdown.insert(priority, count);
        }

        Ok(HabitStatistics::new(
            total,
            done,
            pending,
            category_breakdown,
            priority_breakdown,
        ))
    }

    fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, color, COALESCE(icon, '') FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    name: row.get(0)?,
                    color: row.get(1)?,
                    icon: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }
}

/// Overwrite the mutable columns of one habit, returning the rows touched
fn write_fields(
    conn: &Connection,
    habit_id: HabitId,
    fields: &HabitFields,
) -> Result<usize, StorageError> {
    let now = format_timestamp(Utc::now());
    conn.execute(
        "UPDATE habits SET
            name = ?2,
            category = ?3,
            start_date = ?4,
            frequency = ?5,
            status = ?6,
            priority = ?7,
            notes = ?8,
            target_weekly = ?9,
            updated_at = ?10
         WHERE id = ?1",
        params![
            habit_id.value(),
            fields.name,
            fields.category,
            fields.start_date.to_string(),
            fields.frequency.times_per_week(),
            fields.status.as_str(),
            fields.priority.as_str(),
            fields.notes,
            fields.target_weekly,
            now
        ],
    )
    .map_err(|e| map_write_error(e, &fields.name))
}

/// Recompute the derived counters of one habit from its completion log
fn recompute_counters(
    conn: &Connection,
    habit_id: HabitId,
    policy: StreakPolicy,
    now: &str,
) -> Result<CompletionStats, StorageError> {
    let mut stmt =
        conn.prepare("SELECT date FROM completion_log WHERE habit_id = ?1 AND completed = 1")?;
    let dates = stmt
        .query_map(params![habit_id.value()], |row| parse_date(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    let stats = CompletionStats::from_completed_dates(&dates, policy);

    conn.execute(
        "UPDATE habits SET total_completed = ?1, streak_count = ?2, updated_at = ?3 WHERE id = ?4",
        params![stats.total_completed, stats.streak_count, now, habit_id.value()],
    )?;

    Ok(stats)
}

/// Translate a filter into a parameterized SELECT over habits
///
/// Values are always bound as parameters, never spliced into the SQL text.
pub(crate) fn build_list_query(filter: &HabitFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for predicate in filter.predicates() {
        match predicate {
            Predicate::CategoryIs(category) => {
                clauses.push("category = ?");
                values.push(Value::Text(category));
            }
            Predicate::StatusIs(status) => {
                clauses.push("status = ?");
                values.push(Value::Text(status.as_str().to_string()));
            }
            Predicate::PriorityIs(priority) => {
                clauses.push("priority = ?");
                values.push(Value::Text(priority.as_str().to_string()));
            }
            Predicate::NameOrNotesContains(needle) => {
                clauses.push("(name LIKE ? ESCAPE '\\' OR notes LIKE ? ESCAPE '\\')");
                let pattern = format!("%{}%", escape_like(&needle));
                values.push(Value::Text(pattern.clone()));
                values.push(Value::Text(pattern));
            }
        }
    }

    let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    (sql, values)
}

/// Make LIKE wildcards in user input match literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Classify a failed write: unique name clash, other constraint, or fault
fn map_write_error(err: rusqlite::Error, name: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                return StorageError::DuplicateName {
                    name: name.to_string(),
                };
            }
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            return StorageError::Constraint(detail);
        }
    }
    StorageError::Query(err)
}

/// Fixed-width RFC 3339 so lexical order in SQL equals time order
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| conversion_error(idx, e))
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: HabitId(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        start_date: parse_date(row, 3)?,
        frequency: Frequency(row.get(4)?),
        status: parse_column::<HabitStatus>(row, 5)?,
        priority: parse_column::<Priority>(row, 6)?,
        notes: row.get(7)?,
        target_weekly: row.get(8)?,
        streak_count: row.get(9)?,
        total_completed: row.get(10)?,
        created_at: parse_timestamp(row, 11)?,
        updated_at: parse_timestamp(row, 12)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CompletionEntry> {
    Ok(CompletionEntry {
        id: EntryId(row.get(0)?),
        habit_id: HabitId(row.get(1)?),
        date: parse_date(row, 2)?,
        completed: row.get(3)?,
        note: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}
