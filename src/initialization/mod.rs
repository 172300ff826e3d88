//! Process-level initialization.
//!
//! Sets up the shared resources a service needs before it can build sessions:
//! - Logger (plain or JSON, via `env_logger`)
//! - Database connection pool, sized and configured from `StoreConfig`

mod logger;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::StoreConfig;
use crate::error_handling::InitializationError;
use crate::storage::init_db_pool_with_config;

// Re-export public API
pub use logger::init_logger_with;

/// Initializes logging and the connection pool from one configuration.
///
/// # Errors
///
/// Returns `InitializationError` if the logger is already installed, the database
/// file cannot be created, or the pool cannot be opened.
pub async fn init_store(config: &StoreConfig) -> Result<Arc<SqlitePool>, InitializationError> {
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())?;
    init_db_pool_with_config(config).await
}
