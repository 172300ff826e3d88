//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - Foreign key enforcement, so constraint violations surface as conflicts
//! - Connection limits, acquire timeout and busy timeout from `StoreConfig`
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::{StoreConfig, DEFAULT_ACQUIRE_TIMEOUT_SECS, ENV_DB_PATH};
use crate::error_handling::InitializationError;

/// Initializes a pool using `StoreConfig::from_env()`.
///
/// Reads `RECORD_STORE_DB_PATH` and friends; for library usage prefer
/// `init_db_pool_with_config`, which takes the configuration explicitly.
pub async fn init_db_pool() -> Result<Arc<SqlitePool>, InitializationError> {
    let config = StoreConfig::from_env();
    if std::env::var(ENV_DB_PATH).is_err() {
        info!("{ENV_DB_PATH} not set, using {}", config.db_path.display());
    }
    init_db_pool_with_config(&config).await
}

/// Initializes a pool for an explicit database path with default sizing.
pub async fn init_db_pool_with_path(
    db_path: &Path,
) -> Result<Arc<SqlitePool>, InitializationError> {
    let config = StoreConfig {
        db_path: db_path.to_path_buf(),
        ..Default::default()
    };
    init_db_pool_with_config(&config).await
}

/// Initializes and returns a database connection pool.
///
/// Creates the database file if it doesn't exist, enables WAL mode and
/// foreign keys on every connection.
pub async fn init_db_pool_with_config(
    config: &StoreConfig,
) -> Result<Arc<SqlitePool>, InitializationError> {
    let db_path_str = config.db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(InitializationError::FileCreationError(e.to_string()));
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path_str))
        .map_err(|e| {
            error!("Invalid database path {db_path_str}: {e}");
            InitializationError::PoolError(e)
        })?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            InitializationError::PoolError(e)
        })?;

    info!(
        "Database pool ready at {} (max_connections={}, acquire_timeout={}s, busy_timeout={}ms)",
        db_path_str, config.max_connections, config.acquire_timeout_secs, config.busy_timeout_ms
    );

    Ok(Arc::new(pool))
}

/// Opens a single-connection in-memory pool.
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool is
/// capped at one connection to keep all sessions on the same data. That
/// connection is never reaped for idleness or age: closing it drops the data.
pub async fn init_memory_pool() -> Result<Arc<SqlitePool>, InitializationError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await?;
    Ok(Arc::new(pool))
}
