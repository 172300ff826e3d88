//! record_store library: generic CRUD access over SQLite
//!
//! Every resource endpoint of the service shares one data-access layer,
//! `RecordStore<E>`, parameterized by an entity binding. It provides create,
//! retrieve, update and delete, their bulk variants, filtered lookup and
//! get-or-create, all with the same not-found and conflict semantics.
//!
//! # Example
//!
//! ```no_run
//! use record_store::{init_db_pool_with_path, RecordStore, Session, UpdateMode};
//! # use record_store::{CreateInput, DeclaredField, Entity, FieldMap, UpdateInput};
//! # #[derive(Debug, Clone, sqlx::FromRow)]
//! # struct Payment { id: i64, name: String, amount: i64 }
//! # struct NewPayment { name: String, amount: i64 }
//! # struct PaymentUpdate { amount: Option<i64> }
//! # impl Entity for Payment {
//! #     const TABLE: &'static str = "payments";
//! #     const PRIMARY_KEY: &'static str = "id";
//! #     const COLUMNS: &'static [&'static str] = &["id", "name", "amount"];
//! #     type Key = i64;
//! #     type Create = NewPayment;
//! #     type Update = PaymentUpdate;
//! #     fn key(&self) -> i64 { self.id }
//! # }
//! # impl CreateInput for NewPayment {
//! #     fn fields(&self) -> FieldMap {
//! #         FieldMap::from([("name".into(), self.name.as_str().into()), ("amount".into(), self.amount.into())])
//! #     }
//! # }
//! # impl UpdateInput for PaymentUpdate {
//! #     fn declared(&self) -> Vec<DeclaredField> { vec![DeclaredField::new("amount", self.amount, 0)] }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_path(std::path::Path::new("./payments.db")).await?;
//! let payments = RecordStore::<Payment>::new()?;
//!
//! let mut session = Session::acquire(&pool).await?;
//! let created = payments
//!     .create(&mut session, &NewPayment { name: "A".into(), amount: 10 })
//!     .await?;
//! let before = payments
//!     .update(&mut session, &created.id, &PaymentUpdate { amount: Some(20) }, UpdateMode::Partial)
//!     .await?;
//! assert_eq!(before.amount, 10);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod api;
pub mod config;
mod error_handling;
pub mod initialization;
mod storage;

// Re-export public API
pub use config::{LogFormat, LogLevel, StoreConfig};
pub use error_handling::{
    categorize_sqlx_error, ErrorKind, InitializationError, StoreError, StoreResult,
    ValidationError,
};
pub use initialization::{init_logger_with, init_store};
pub use storage::{
    init_db_pool, init_db_pool_with_config, init_db_pool_with_path, init_memory_pool, CreateInput,
    DeclaredField, Entity, FieldMap, Filter, RecordStore, Session, Status, StatusResponse,
    TrustedRecordStore, UpdateInput, UpdateMode, Value,
};
