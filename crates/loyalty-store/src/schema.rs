//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Key-value state, keyed by the caller's key.
    pub const STATE: &str = "state";

    /// Table schemas, keyed by table name.
    pub const TABLES: &str = "tables";

    /// Table rows, keyed by `table || key columns` (see `keys::row_key`).
    pub const ROWS: &str = "rows";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::STATE, cf::TABLES, cf::ROWS]
}
