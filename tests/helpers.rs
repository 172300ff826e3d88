// Shared test helpers: entity bindings and database setup.
//
// Two entities are used across the integration tests:
// - `Payment`, keyed by `id`, with a nullable foreign key to contacts
// - `Contact`, keyed by `contact_id`, with a unique email

#![allow(dead_code)] // Each test binary uses a different subset

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};

use record_store::{
    init_db_pool_with_config, init_memory_pool, CreateInput, DeclaredField, Entity, FieldMap,
    Session, StoreConfig, UpdateInput, ValidationError, Value,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    nickname TEXT
);
CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    amount INTEGER NOT NULL DEFAULT 0,
    contact_id INTEGER REFERENCES contacts(contact_id)
);
";

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Payment {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub contact_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub name: String,
    pub amount: i64,
    pub contact_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub contact_id: Option<Option<i64>>,
}

impl Entity for Payment {
    const TABLE: &'static str = "payments";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "name", "amount", "contact_id"];

    type Key = i64;
    type Create = NewPayment;
    type Update = PaymentUpdate;

    fn key(&self) -> i64 {
        self.id
    }
}

impl CreateInput for NewPayment {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name must not be empty").with_metadata("field=name"));
        }
        if self.amount < 0 {
            return Err(ValidationError::new("amount must not be negative")
                .with_metadata(format!("amount={}", self.amount)));
        }
        Ok(())
    }

    fn fields(&self) -> FieldMap {
        FieldMap::from([
            ("name".to_string(), Value::from(self.name.as_str())),
            ("amount".to_string(), Value::from(self.amount)),
            ("contact_id".to_string(), Value::from(self.contact_id)),
        ])
    }
}

impl UpdateInput for PaymentUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.amount {
            Some(amount) if amount < 0 => Err(ValidationError::new("amount must not be negative")),
            _ => Ok(()),
        }
    }

    fn declared(&self) -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("name", self.name.clone(), ""),
            DeclaredField::new("amount", self.amount, 0),
            DeclaredField::new("contact_id", self.contact_id.map(Value::from), Value::Null),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Contact {
    pub contact_id: i64,
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub email: Option<String>,
    pub nickname: Option<Option<String>>,
}

impl Entity for Contact {
    const TABLE: &'static str = "contacts";
    const PRIMARY_KEY: &'static str = "contact_id";
    const COLUMNS: &'static [&'static str] = &["contact_id", "email", "nickname"];

    type Key = i64;
    type Create = NewContact;
    type Update = ContactUpdate;

    fn key(&self) -> i64 {
        self.contact_id
    }
}

impl CreateInput for NewContact {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.email.contains('@') {
            return Err(ValidationError::new("email is not valid")
                .with_metadata(format!("email={}", self.email)));
        }
        Ok(())
    }

    fn fields(&self) -> FieldMap {
        FieldMap::from([
            ("email".to_string(), Value::from(self.email.as_str())),
            ("nickname".to_string(), Value::from(self.nickname.clone())),
        ])
    }
}

impl UpdateInput for ContactUpdate {
    fn declared(&self) -> Vec<DeclaredField> {
        vec![
            DeclaredField::new("email", self.email.clone(), ""),
            DeclaredField::new("nickname", self.nickname.clone().map(Value::from), Value::Null),
        ]
    }
}

pub fn payment(name: &str, amount: i64) -> NewPayment {
    NewPayment {
        name: name.to_string(),
        amount,
        contact_id: None,
    }
}

pub fn contact(email: &str) -> NewContact {
    NewContact {
        email: email.to_string(),
        nickname: None,
    }
}

/// Creates the test tables on `pool`.
pub async fn create_schema(pool: &SqlitePool) {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .expect("Failed to create schema");
}

/// Inserts `count` payments named `p1..pN` in one statement, with ids `1..=count`.
pub async fn seed_payments(pool: &SqlitePool, count: i64) {
    sqlx::query(
        "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?)
         INSERT INTO payments (name, amount) SELECT 'p' || n, 1 FROM seq",
    )
    .bind(count)
    .execute(pool)
    .await
    .expect("Failed to seed payments");
}

/// Creates an in-memory single-connection pool with the schema applied.
pub async fn create_test_pool() -> Arc<SqlitePool> {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create test database pool");
    create_schema(&pool).await;
    pool
}

/// Creates a file-backed pool that several sessions can share.
pub async fn create_test_pool_with_path(db_path: &Path, max_connections: u32) -> Arc<SqlitePool> {
    create_test_pool_with_config(&StoreConfig {
        db_path: db_path.to_path_buf(),
        max_connections,
        ..Default::default()
    })
    .await
}

/// Creates a file-backed pool from `config` with the schema applied.
pub async fn create_test_pool_with_config(config: &StoreConfig) -> Arc<SqlitePool> {
    let pool = init_db_pool_with_config(config)
        .await
        .expect("Failed to create test database");
    create_schema(pool.as_ref()).await;
    pool
}

/// Creates an in-memory pool whose single connection times out quickly once taken.
pub async fn create_exhaustible_pool(acquire_timeout: Duration) -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(acquire_timeout)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create exhaustible pool")
}

/// In-memory pool plus a session on it.
pub async fn create_test_session() -> Session {
    let pool = create_test_pool().await;
    Session::acquire(&pool)
        .await
        .expect("Failed to acquire session")
}
