//! Equality filters for first/last lookups.

use serde::{Deserialize, Serialize};

use super::value::{FieldMap, Value};

/// Field to expected value, combined with AND.
///
/// `Value::Null` matches with `IS NULL`. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: FieldMap,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition, replacing any earlier one on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn conditions(&self) -> &FieldMap {
        &self.conditions
    }
}

impl From<FieldMap> for Filter {
    fn from(conditions: FieldMap) -> Self {
        Self { conditions }
    }
}
