/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit store. Each tool takes a params struct (whose JSON
/// schema is advertised by `tools/list`) and returns a serializable response
/// carrying a human-readable `message`.

pub mod categories;
pub mod complete;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod stats;
pub mod status;
pub mod update;

// Re-export tool functions for easy access
pub use categories::*;
pub use complete::*;
pub use create::*;
pub use delete::*;
pub use get::*;
pub use list::*;
pub use stats::*;
pub use status::*;
pub use update::*;

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::{DomainError, Frequency};
use crate::storage::{local_today, StorageError};

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        StorageError::Validation(DomainError::InvalidDate(format!(
            "'{}' is not a YYYY-MM-DD date",
            input
        )))
    })
}

/// Parse an optional date argument, defaulting to today's local date
pub(crate) fn parse_date_or_today(input: Option<&str>) -> Result<NaiveDate, StorageError> {
    match input {
        Some(s) => parse_date(s),
        None => Ok(local_today()),
    }
}

/// Parse an optional enum argument such as a status or priority
pub(crate) fn parse_optional<T>(input: Option<&str>) -> Result<Option<T>, StorageError>
where
    T: FromStr<Err = DomainError>,
{
    input
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<T>())
        .transpose()
        .map_err(StorageError::from)
}

/// Check a raw frequency argument before narrowing it to u8
pub(crate) fn parse_frequency(times_per_week: u32) -> Result<Frequency, StorageError> {
    let narrowed = u8::try_from(times_per_week).unwrap_or(u8::MAX);
    Ok(Frequency::new(narrowed)?)
}
