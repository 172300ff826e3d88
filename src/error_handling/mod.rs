//! Error handling for the record store.
//!
//! This module provides:
//! - The `StoreError` taxonomy (not found, validation, conflict, timeout, transport)
//! - `ValidationError` with detail and optional metadata
//! - Categorization of `sqlx` errors into that taxonomy
//!
//! No error is retried or swallowed here. Every failure reaches the caller as a
//! typed value and the HTTP boundary alone decides the status code.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_sqlx_error;
pub use types::{ErrorKind, InitializationError, StoreError, ValidationError};

/// Result alias used by every store operation.
pub type StoreResult<T> = Result<T, StoreError>;
