//! Statement construction for a resolved entity binding.
//!
//! Table and column names cannot be bound as parameters, so every identifier
//! that reaches SQL text is first checked against the binding: the table and
//! column constants are validated once, and field names coming from inputs,
//! filters or raw maps must be one of the declared columns.

use log::debug;

use super::entity::Entity;
use super::filter::Filter;
use super::value::{FieldMap, Value};
use crate::error_handling::{StoreError, StoreResult, ValidationError};

/// Most `?` parameters SQLite accepts in one statement (`SQLITE_MAX_VARIABLE_NUMBER`).
///
/// Key-set statements are split into chunks that stay under it.
pub(crate) const MAX_BIND_VARIABLES: usize = 32766;

/// Result ordering by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyOrder {
    Ascending,
    Descending,
}

impl KeyOrder {
    fn keyword(self) -> &'static str {
        match self {
            KeyOrder::Ascending => "ASC",
            KeyOrder::Descending => "DESC",
        }
    }
}

/// Table name, key column and column set of one entity type, validated once.
#[derive(Debug, Clone)]
pub(crate) struct TableBinding {
    pub table: &'static str,
    pub primary_key: &'static str,
    columns: &'static [&'static str],
}

impl TableBinding {
    pub fn resolve<E: Entity>() -> StoreResult<Self> {
        check_identifier(E::TABLE)?;
        for column in E::COLUMNS {
            check_identifier(column)?;
        }
        if !E::COLUMNS.contains(&E::PRIMARY_KEY) {
            return Err(StoreError::InvalidBinding(format!(
                "primary key `{}` is not a declared column of `{}`",
                E::PRIMARY_KEY,
                E::TABLE
            )));
        }
        debug!(
            "Resolved binding for table {} (primary key {})",
            E::TABLE,
            E::PRIMARY_KEY
        );
        Ok(Self {
            table: E::TABLE,
            primary_key: E::PRIMARY_KEY,
            columns: E::COLUMNS,
        })
    }

    /// Fails with `ValidationError` unless every field is a declared column.
    pub fn check_fields<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a String>,
    ) -> StoreResult<()> {
        for field in fields {
            if !self.columns.contains(&field.as_str()) {
                return Err(ValidationError::new(format!(
                    "unknown field `{field}` for `{}`",
                    self.table
                ))
                .with_metadata(format!("allowed fields: {}", self.columns.join(", ")))
                .into());
            }
        }
        Ok(())
    }

    /// Fails with `ValidationError` when an update tries to assign the primary key.
    pub fn check_assignments(&self, fields: &FieldMap) -> StoreResult<()> {
        self.check_fields(fields.keys())?;
        if fields.contains_key(self.primary_key) {
            return Err(ValidationError::new(format!(
                "primary key `{}` of `{}` cannot be modified",
                self.primary_key, self.table
            ))
            .into());
        }
        Ok(())
    }

    fn select(&self) -> String {
        format!("SELECT * FROM \"{}\"", self.table)
    }

    pub fn select_by_key(&self) -> String {
        format!("{} WHERE \"{}\" = ?", self.select(), self.primary_key)
    }

    pub fn select_by_keys(&self, count: usize) -> String {
        format!(
            "{} WHERE \"{}\" IN ({}) ORDER BY \"{}\" ASC",
            self.select(),
            self.primary_key,
            placeholders(count),
            self.primary_key
        )
    }

    pub fn select_all(&self) -> String {
        format!("{} ORDER BY \"{}\" ASC", self.select(), self.primary_key)
    }

    /// First matching row in `order`, with the bind values for the filter.
    pub fn select_filtered(&self, filter: &Filter, order: KeyOrder) -> (String, Vec<Value>) {
        let mut sql = self.select();
        let mut binds = Vec::new();
        let mut clauses = Vec::new();
        for (field, value) in filter.conditions() {
            if value.is_null() {
                clauses.push(format!("\"{field}\" IS NULL"));
            } else {
                clauses.push(format!("\"{field}\" = ?"));
                binds.push(value.clone());
            }
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY \"{}\" {} LIMIT 1",
            self.primary_key,
            order.keyword()
        ));
        (sql, binds)
    }

    pub fn count(&self) -> String {
        format!("SELECT COUNT(*) FROM \"{}\"", self.table)
    }

    pub fn insert(&self, fields: &FieldMap) -> String {
        if fields.is_empty() {
            return format!("INSERT INTO \"{}\" DEFAULT VALUES RETURNING *", self.table);
        }
        let columns: Vec<String> = fields.keys().map(|c| format!("\"{c}\"")).collect();
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.table,
            columns.join(", "),
            placeholders(fields.len())
        )
    }

    fn set_clause(fields: &FieldMap) -> String {
        fields
            .keys()
            .map(|c| format!("\"{c}\" = ?"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn update_by_key(&self, fields: &FieldMap) -> String {
        format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = ?",
            self.table,
            Self::set_clause(fields),
            self.primary_key
        )
    }

    pub fn update_by_keys(&self, fields: &FieldMap, count: usize) -> String {
        format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" IN ({})",
            self.table,
            Self::set_clause(fields),
            self.primary_key,
            placeholders(count)
        )
    }

    pub fn delete_by_key(&self) -> String {
        format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = ?",
            self.table, self.primary_key
        )
    }

    pub fn delete_all(&self) -> String {
        format!("DELETE FROM \"{}\"", self.table)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn check_identifier(name: &str) -> StoreResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidBinding(format!(
            "`{name}` is not a plain SQL identifier"
        )))
    }
}
