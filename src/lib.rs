/// Public library interface for the DailyRoutine habit store
///
/// This module exports the habit store, its domain types and the MCP server
/// that exposes the store to MCP clients.

use thiserror::Error;

// Internal modules
pub mod analytics;
pub mod config;
mod domain;
pub mod mcp;
mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalyticsEngine, HabitStatistics};
pub use config::{default_database_path, StoreConfig};
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// DailyRoutine server: a habit store exposed over MCP
pub struct DailyRoutineServer {
    storage: SqliteStorage,
}

impl DailyRoutineServer {
    /// Open the store described by `config`
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub fn new(config: &StoreConfig) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing DailyRoutine with database {:?} (streak policy: {})",
            config.database_path,
            config.streak_policy
        );

        config.ensure_parent_dir()?;
        let storage = SqliteStorage::open(config)?;

        Ok(Self { storage })
    }

    /// Wrap an already opened store
    pub fn from_storage(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let stats = self.storage.statistics()?;
        tracing::info!(
            "Server started successfully, found {} existing habits",
            stats.total_habits
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}
