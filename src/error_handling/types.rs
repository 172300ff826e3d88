//! Error type definitions.
//!
//! This module defines every failure the record store can hand back to its
//! caller, plus the coarse `ErrorKind` the HTTP boundary maps to status codes.

use log::SetLoggerError;
use strum_macros::{Display, EnumIter as EnumIterMacro};
use thiserror::Error;

/// Input failed shape constraints before any statement reached the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct ValidationError {
    /// Human-readable reason.
    pub detail: String,
    /// Optional structured context (offending field, constraint, ...).
    pub metadata: Option<String>,
}

impl ValidationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// Error types for record store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// One or more addressed records do not exist.
    #[error("{table}: object not found (keys: {})", .keys.join(", "))]
    NotFound {
        table: &'static str,
        keys: Vec<String>,
    },

    /// Input rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store rejected a write because of a constraint violation.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    /// Waiting on the store or its connection pool timed out.
    #[error("Timeout: {0}")]
    Timeout(#[source] sqlx::Error),

    /// Any other store or connection failure.
    #[error("SQL error: {0}")]
    Transport(#[source] sqlx::Error),

    /// The entity binding itself is unusable (bad identifier, unknown key column).
    #[error("Invalid entity binding: {0}")]
    InvalidBinding(String),
}

impl StoreError {
    pub(crate) fn not_found<K: ToString>(
        table: &'static str,
        keys: impl IntoIterator<Item = K>,
    ) -> Self {
        Self::NotFound {
            table,
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::InvalidBinding(_) => ErrorKind::InvalidBinding,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Coarse failure categories, one per transport-level response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIterMacro)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Timeout,
    Transport,
    InvalidBinding,
}

impl ErrorKind {
    /// HTTP status code the boundary layer answers with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Timeout => 504,
            ErrorKind::Transport => 503,
            ErrorKind::InvalidBinding => 500,
        }
    }
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// Error opening or configuring the connection pool.
    #[error("Database pool error: {0}")]
    PoolError(#[from] sqlx::Error),
}
