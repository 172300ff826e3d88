//! Store error categorization.
//!
//! Every `sqlx::Error` that escapes a statement is sorted into exactly one
//! `StoreError` variant here, so callers never see a raw driver error and a
//! timeout is never mistaken for a missing record.

use std::io;

use sqlx::error::{DatabaseError, ErrorKind as DbErrorKind};

use super::types::StoreError;

/// Categorizes a `sqlx::Error` into a `StoreError`.
///
/// - Constraint violations (unique, foreign key, not null, check) become `Conflict`
/// - Pool acquire timeouts, I/O timeouts and a database left locked past the
///   busy timeout (`SQLITE_BUSY`, `SQLITE_LOCKED`) become `Timeout`
/// - Everything else becomes `Transport`
pub fn categorize_sqlx_error(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        let constraint = match db_error.kind() {
            DbErrorKind::UniqueViolation => Some("unique constraint violated"),
            DbErrorKind::ForeignKeyViolation => Some("foreign key constraint violated"),
            DbErrorKind::NotNullViolation => Some("not null constraint violated"),
            DbErrorKind::CheckViolation => Some("check constraint violated"),
            _ => None,
        };
        if let Some(reason) = constraint {
            let message = format!("{reason}: {}", db_error.message());
            return StoreError::Conflict {
                message,
                source: error,
            };
        }
    }

    if is_timeout(&error) {
        return StoreError::Timeout(error);
    }

    StoreError::Transport(error)
}

fn is_timeout(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Io(io_error) => io_error.kind() == io::ErrorKind::TimedOut,
        sqlx::Error::Database(db_error) => is_lock_contention(db_error.as_ref()),
        _ => false,
    }
}

/// SQLITE_BUSY (5) or SQLITE_LOCKED (6), including their extended codes.
fn is_lock_contention(db_error: &dyn DatabaseError) -> bool {
    let primary_code = db_error
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| code & 0xff);
    if matches!(primary_code, Some(5 | 6)) {
        return true;
    }
    let message = db_error.message();
    message.contains("database is locked") || message.contains("database is busy")
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        categorize_sqlx_error(error)
    }
}
