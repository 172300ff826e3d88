//! Dynamic field values.
//!
//! Inputs, filters and raw update maps all reduce to `Value`s keyed by column
//! name before any SQL is built. This keeps statement construction generic over
//! every entity type while the typed record shapes stay with the caller.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteArguments;
use sqlx::Arguments;

use crate::error_handling::{StoreResult, ValidationError};

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Column name to value, ordered by column name so generated SQL is stable.
pub type FieldMap = BTreeMap<String, Value>;

/// Appends `value` to a set of SQLite bind arguments.
pub(crate) fn bind_value<'q>(args: &mut SqliteArguments<'q>, value: &Value) -> StoreResult<()> {
    let result = match value {
        Value::Null => args.add(Option::<i64>::None),
        Value::Bool(b) => args.add(*b),
        Value::Integer(i) => args.add(*i),
        Value::Real(r) => args.add(*r),
        Value::Text(s) => args.add(s.clone()),
    };
    result.map_err(|e| {
        ValidationError::new(format!("value {value} cannot be bound"))
            .with_metadata(e.to_string())
            .into()
    })
}

/// Builds bind arguments for `values` in order.
pub(crate) fn arguments<'q, 'v, I>(values: I) -> StoreResult<SqliteArguments<'q>>
where
    I: IntoIterator<Item = &'v Value>,
{
    let mut args = SqliteArguments::default();
    for value in values {
        bind_value(&mut args, value)?;
    }
    Ok(args)
}
