//! Store configuration and constants.
//!
//! This module provides:
//! - Default values (pool sizing, acquire timeout, database path)
//! - `StoreConfig`, buildable in code or from environment variables
//! - Log level and format selection

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, StoreConfig};
