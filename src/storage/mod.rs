//! Data access layer.
//!
//! - `pool`: connection pool bootstrap
//! - `session`: per-request connection with one-statement-one-commit writes
//! - `entity`: entity bindings and input shapes
//! - `store`: the generic `RecordStore<E>`
//! - `trusted`: raw field-map updates for internal callers

pub mod entity;
pub mod filter;
pub mod pool;
pub mod session;
mod sql;
pub mod status;
pub mod store;
pub mod trusted;
pub mod value;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use entity::{CreateInput, DeclaredField, Entity, UpdateInput, UpdateMode};
pub use filter::Filter;
pub use pool::{init_db_pool, init_db_pool_with_config, init_db_pool_with_path, init_memory_pool};
pub use session::Session;
pub use status::{Status, StatusResponse};
pub use store::RecordStore;
pub use trusted::TrustedRecordStore;
pub use value::{FieldMap, Value};
