/// Store configuration
///
/// Where the database lives and how streaks are computed. The binary builds
/// this from command line arguments; tests build it directly.

use std::path::{Path, PathBuf};

use crate::domain::StreakPolicy;

const APP_DIR: &str = "daily_routine";
const DATABASE_FILE: &str = "daily_routine.db";

/// Settings needed to open a habit store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub streak_policy: StreakPolicy,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            streak_policy: StreakPolicy::default(),
        }
    }

    pub fn with_streak_policy(mut self, streak_policy: StreakPolicy) -> Self {
        self.streak_policy = streak_policy;
        self
    }

    /// Create the parent directory of the database file if it is missing
    pub fn ensure_parent_dir(&self) -> std::io::Result<()> {
        match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                std::fs::create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Get the default database path with robust fallback strategy
///
/// Tries the home, data and config directories and then the working
/// directory, taking the first one that is writable. Falls back to the
/// system temp directory.
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(format!(".{}", APP_DIR))),
        dirs::data_dir().map(|p| p.join(APP_DIR)),
        dirs::config_dir().map(|p| p.join(APP_DIR)),
        std::env::current_dir().ok().map(|p| p.join(format!(".{}", APP_DIR))),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DATABASE_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join(APP_DIR);
    std::fs::create_dir_all(&temp_dir)?;
    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join(DATABASE_FILE))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".test_write");
    if std::fs::write(&probe, "test").is_err() {
        return false;
    }
    let _ = std::fs::remove_file(&probe);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults_to_consecutive_streaks() {
        let config = StoreConfig::new("/tmp/habits.db");
        assert_eq!(config.streak_policy, StreakPolicy::Consecutive);

        let config = config.with_streak_policy(StreakPolicy::LifetimeCount);
        assert_eq!(config.streak_policy, StreakPolicy::LifetimeCount);
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested_dirs() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("a").join("b").join("habits.db");

        let config = StoreConfig::new(&db_path);
        config.ensure_parent_dir().unwrap();
        assert!(db_path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_writable_dir_probe_cleans_up() {
        let temp_dir = tempdir().unwrap();
        assert!(is_writable_dir(temp_dir.path()));
        assert!(!temp_dir.path().join(".test_write").exists());
    }

    #[test]
    fn test_default_path_names_database_file() {
        let path = default_database_path().unwrap();
        assert_eq!(path.file_name().unwrap(), DATABASE_FILE);
    }
}
