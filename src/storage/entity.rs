//! Entity type bindings.
//!
//! An entity binding ties together the record shape (`Entity`), the shape
//! accepted on creation (`CreateInput`) and the shape accepted on update
//! (`UpdateInput`), plus the table name and the single primary-key column.
//! `RecordStore<E>` resolves the binding once at construction.

use std::fmt::{Debug, Display};

use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use super::value::{FieldMap, Value};
use crate::error_handling::ValidationError;

/// A table-backed record type.
///
/// # Invariants
///
/// - `PRIMARY_KEY` names exactly one column and appears in `COLUMNS`.
/// - The primary key of a stored record never changes.
pub trait Entity:
    for<'r> FromRow<'r, SqliteRow> + Clone + Debug + Send + Sync + Unpin + 'static
{
    /// Table name.
    const TABLE: &'static str;
    /// Primary-key column name. Not assumed to be `id`.
    const PRIMARY_KEY: &'static str;
    /// Every column, primary key included.
    const COLUMNS: &'static [&'static str];

    type Key: Into<Value> + Clone + Ord + Display + Debug + Send + Sync;
    type Create: CreateInput;
    type Update: UpdateInput;

    /// Primary-key value of this record.
    fn key(&self) -> Self::Key;
}

/// Validated input for `RecordStore::create`.
pub trait CreateInput: Send + Sync {
    /// Shape constraints checked before any statement runs.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Every field to insert. Store-assigned columns (the key, defaults) may be omitted.
    fn fields(&self) -> FieldMap;
}

/// One declared field of an update shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredField {
    pub name: &'static str,
    /// `Some` when the caller explicitly set the field, `None` when left unset.
    pub value: Option<Value>,
    /// Value written by a full update when the field is unset.
    pub default: Value,
}

impl DeclaredField {
    pub fn new<V, D>(name: &'static str, value: Option<V>, default: D) -> Self
    where
        V: Into<Value>,
        D: Into<Value>,
    {
        Self {
            name,
            value: value.map(Into::into),
            default: default.into(),
        }
    }
}

/// Validated input for `RecordStore::update` and `RecordStore::bulk_update`.
pub trait UpdateInput: Send + Sync {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Every declared field, set or not.
    fn declared(&self) -> Vec<DeclaredField>;
}

/// How unset fields of an update input are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Only explicitly set fields are written.
    Partial,
    /// Every declared field is written; unset ones get their default.
    #[default]
    Full,
}

impl UpdateMode {
    pub fn from_partial(partial: bool) -> Self {
        if partial {
            UpdateMode::Partial
        } else {
            UpdateMode::Full
        }
    }

    /// Column assignments for `input` under this mode.
    pub fn assignments<U: UpdateInput + ?Sized>(self, input: &U) -> FieldMap {
        input
            .declared()
            .into_iter()
            .filter_map(|field| match (field.value, self) {
                (Some(value), _) => Some((field.name.to_string(), value)),
                (None, UpdateMode::Full) => Some((field.name.to_string(), field.default)),
                (None, UpdateMode::Partial) => None,
            })
            .collect()
    }
}
