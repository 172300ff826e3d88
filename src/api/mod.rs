//! HTTP boundary helpers.
//!
//! Routing lives with the service. This module only fixes how store outcomes
//! look on the wire:
//! - `StoreError` -> status code plus `{"detail", "metadata"}` body
//! - `health_check` -> `{"status": "Success"}`

mod errors;
mod health;

pub use errors::ErrorBody;
pub use health::health_check;
