//! Error types for loyalty storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Table already created.
    #[error("table already exists: {table}")]
    TableExists {
        /// The table name.
        table: String,
    },

    /// Table has not been created.
    #[error("table not found: {table}")]
    TableNotFound {
        /// The table name.
        table: String,
    },

    /// Row or key does not match the table schema.
    #[error("schema mismatch for table {table}: {reason}")]
    SchemaMismatch {
        /// The table name.
        table: String,
        /// What did not match.
        reason: String,
    },
}
