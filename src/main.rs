/// Main entry point for the DailyRoutine MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use daily_routine::{default_database_path, DailyRoutineServer, StoreConfig, StreakPolicy};

/// Command line arguments for the DailyRoutine MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "DAILY_ROUTINE_DB")]
    database: Option<PathBuf>,

    /// How streaks are counted: consecutive or lifetime-count
    #[arg(long, default_value_t = StreakPolicy::Consecutive)]
    streak_policy: StreakPolicy,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("daily_routine={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting DailyRoutine MCP server");

    let database_path = match args.database {
        Some(path) => path,
        None => default_database_path()?,
    };
    info!("Using database at: {}", database_path.display());

    let config = StoreConfig::new(database_path).with_streak_policy(args.streak_policy);
    let server = DailyRoutineServer::new(&config)?;

    server.run().await?;

    info!("DailyRoutine MCP server shutdown complete");
    Ok(())
}
