//! Shared test helpers for storage module tests.
//!
//! Provides a small `payments` entity and an in-memory session with its table.

use sqlx::FromRow;

use crate::error_handling::ValidationError;
use crate::storage::{
    init_memory_pool, CreateInput, DeclaredField, Entity, FieldMap, Session, UpdateInput,
};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Payment {
    pub id: i64,
    pub name: String,
    pub amount: i64,
}

pub struct NewPayment {
    pub name: String,
    pub amount: i64,
}

#[derive(Default)]
pub struct PaymentUpdate {
    pub name: Option<String>,
    pub amount: Option<i64>,
}

impl Entity for Payment {
    const TABLE: &'static str = "payments";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "name", "amount"];

    type Key = i64;
    type Create = NewPayment;
    type Update = PaymentUpdate;

    fn key(&self) -> i64 {
        self.id
    }
}

impl CreateInput for NewPayment {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new("name must not be empty").with_metadata("field=name"));
        }
        Ok(())
    }

    fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), self.name.as_str().into());
        fields.insert("amount".into(), self.amount.into());
        fields
    }
}

impl UpdateInput for PaymentUpdate {
    fn declared(&self) -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("name", self.name.clone(), ""),
            DeclaredField::new("amount", self.amount, 0),
        ]
    }
}

pub fn new_payment(name: &str, amount: i64) -> NewPayment {
    NewPayment {
        name: name.to_string(),
        amount,
    }
}

/// Opens an in-memory database with the `payments` table and returns a session on it.
pub async fn create_test_session() -> Session {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create test database pool");
    sqlx::query(
        "CREATE TABLE payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool.as_ref())
    .await
    .expect("Failed to create payments table");
    Session::acquire(&pool)
        .await
        .expect("Failed to acquire session")
}
