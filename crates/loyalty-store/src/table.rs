//! Table schema and row types for the indexed table store.
//!
//! A table is a named, ordered list of typed columns, some of which are key
//! columns. Rows are positional: the n-th value belongs to the n-th column.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// UTF-8 string.
    String,

    /// Signed 64-bit integer.
    Int64,

    /// Boolean.
    Bool,
}

/// A column in a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,

    /// Value type.
    pub column_type: ColumnType,

    /// Whether this column is part of the row key.
    pub key: bool,
}

impl ColumnDefinition {
    /// A key column of type `String`.
    #[must_use]
    pub fn string_key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::String,
            key: true,
        }
    }

    /// A non-key column of type `String`.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::String,
            key: false,
        }
    }
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,

    /// Columns in row order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Create a table definition.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Number of key columns.
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.columns.iter().filter(|c| c.key).count()
    }

    /// Check that the schema itself is usable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaMismatch` if the name is empty, there are no
    /// columns, or there is no key column.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(self.mismatch("table name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(self.mismatch("table must have at least one column"));
        }
        if self.key_len() == 0 {
            return Err(self.mismatch("table must have at least one key column"));
        }
        Ok(())
    }

    /// Check a row against this schema and return its key columns.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaMismatch` if the column count or any
    /// column type differs from the schema.
    pub fn row_key(&self, row: &Row) -> Result<Vec<Column>> {
        if row.columns.len() != self.columns.len() {
            return Err(self.mismatch(&format!(
                "expected {} columns, got {}",
                self.columns.len(),
                row.columns.len()
            )));
        }

        let mut key = Vec::with_capacity(self.key_len());
        for (definition, value) in self.columns.iter().zip(&row.columns) {
            if value.column_type() != definition.column_type {
                return Err(self.mismatch(&format!(
                    "column {} expects {:?}, got {:?}",
                    definition.name,
                    definition.column_type,
                    value.column_type()
                )));
            }
            if definition.key {
                key.push(value.clone());
            }
        }
        Ok(key)
    }

    /// Check key columns supplied for a lookup or scan.
    ///
    /// `exact` requires the full key; otherwise any leading prefix is allowed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaMismatch` if there are too many (or, when
    /// `exact`, too few) key columns, or a type differs.
    pub fn check_key(&self, key: &[Column], exact: bool) -> Result<()> {
        let key_len = self.key_len();
        if key.len() > key_len || (exact && key.len() != key_len) {
            return Err(self.mismatch(&format!(
                "expected {key_len} key columns, got {}",
                key.len()
            )));
        }

        let key_types = self.columns.iter().filter(|c| c.key).map(|c| c.column_type);
        for (value, expected) in key.iter().zip(key_types) {
            if value.column_type() != expected {
                return Err(self.mismatch(&format!(
                    "key column expects {expected:?}, got {:?}",
                    value.column_type()
                )));
            }
        }
        Ok(())
    }

    fn mismatch(&self, reason: &str) -> StoreError {
        StoreError::SchemaMismatch {
            table: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// String value.
    String(String),

    /// Integer value.
    Int64(i64),

    /// Boolean value.
    Bool(bool),
}

impl Column {
    /// Type of this value.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::String(_) => ColumnType::String,
            Self::Int64(_) => ColumnType::Int64,
            Self::Bool(_) => ColumnType::Bool,
        }
    }
}

impl From<String> for Column {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A table row. An empty row stands for "no such row".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Column values in schema order.
    pub columns: Vec<Column>,
}

impl Row {
    /// Create a row from its values.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Whether this row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
