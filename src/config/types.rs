//! Configuration types.
//!
//! This module defines the store configuration struct and the logging enums it
//! carries. Everything can be built programmatically; `StoreConfig::from_env`
//! layers environment overrides on top of the defaults.

use std::path::PathBuf;
use std::str::FromStr;

use log::warn;
use strum_macros::{Display, EnumString};

use crate::config::constants::{
    DB_PATH, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_MAX_CONNECTIONS,
    ENV_ACQUIRE_TIMEOUT_SECS, ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_MAX_CONNECTIONS,
};

/// Logging level.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Store configuration.
///
/// # Examples
///
/// ```no_run
/// use record_store::StoreConfig;
/// use std::path::PathBuf;
///
/// let config = StoreConfig {
///     db_path: PathBuf::from("./payments.db"),
///     max_connections: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Milliseconds to wait on a locked database file
    pub busy_timeout_ms: u64,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl StoreConfig {
    /// Builds a configuration from `RECORD_STORE_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable values are logged and
    /// ignored rather than aborting startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            db_path: lookup(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            max_connections: parse_or(&lookup, ENV_MAX_CONNECTIONS, defaults.max_connections),
            acquire_timeout_secs: parse_or(
                &lookup,
                ENV_ACQUIRE_TIMEOUT_SECS,
                defaults.acquire_timeout_secs,
            ),
            busy_timeout_ms: parse_or(&lookup, ENV_BUSY_TIMEOUT_MS, defaults.busy_timeout_ms),
            log_level: parse_or(&lookup, ENV_LOG_LEVEL, defaults.log_level),
            log_format: parse_or(&lookup, ENV_LOG_FORMAT, defaults.log_format),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value {raw:?} for {key}");
                default
            }
        },
        None => default,
    }
}
