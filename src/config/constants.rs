//! Configuration constants.
//!
//! Defaults used when neither the caller nor the environment supplies a value.

/// Default SQLite database file.
pub const DB_PATH: &str = "./record_store.db";

/// Maximum pooled connections. Each live `Session` holds one of these.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Seconds to wait for a free pooled connection before failing with a timeout.
///
/// The store layer itself never times out a statement; this only bounds how
/// long `Session::acquire` waits on an exhausted pool.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Milliseconds a statement waits on a locked database file before SQLite
/// gives up with `SQLITE_BUSY`, surfaced as a timeout.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

// Environment overrides read by `StoreConfig::from_env`
pub const ENV_DB_PATH: &str = "RECORD_STORE_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "RECORD_STORE_MAX_CONNECTIONS";
pub const ENV_ACQUIRE_TIMEOUT_SECS: &str = "RECORD_STORE_ACQUIRE_TIMEOUT_SECS";
pub const ENV_BUSY_TIMEOUT_MS: &str = "RECORD_STORE_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "RECORD_STORE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "RECORD_STORE_LOG_FORMAT";

/// Detail string returned for every input validation failure at the HTTP boundary.
pub const VALIDATION_DETAIL: &str = "Provided values not valid.";
