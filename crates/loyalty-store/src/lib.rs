//! Storage layer for the loyalty ledger.
//!
//! This crate provides the two storage primitives the ledger is written
//! against, plus two backends that implement both of them:
//!
//! - [`KeyValueStore`]: one opaque blob per string key
//! - [`IndexedTable`]: named tables of typed, positional rows addressed by
//!   their key columns
//!
//! Backends:
//!
//! - [`MemoryStore`]: `RwLock`-guarded maps, for tests and ephemeral runs
//! - [`RocksStore`]: `RocksDB` with column families (feature `rocksdb-backend`)
//!
//! # Architecture
//!
//! The `RocksDB` backend uses the following column families:
//!
//! - `state`: key-value blobs, keyed by the caller's key
//! - `tables`: table schemas (CBOR), keyed by table name
//! - `rows`: table rows (CBOR), keyed by `keys::row_key`
//!
//! # Example
//!
//! ```
//! use loyalty_store::{ColumnDefinition, IndexedTable, KeyValueStore, MemoryStore, Row, TableSchema};
//!
//! let store = MemoryStore::new();
//! store.put("U1", b"{}").unwrap();
//! assert_eq!(store.get("U1").unwrap(), Some(b"{}".to_vec()));
//!
//! let schema = TableSchema::new(
//!     "Users",
//!     vec![ColumnDefinition::string_key("id"), ColumnDefinition::string("name")],
//! );
//! store.create_table(&schema).unwrap();
//! assert!(store.insert_row("Users", Row::new(vec!["U1".into(), "Ada".into()])).unwrap());
//! assert!(!store.insert_row("Users", Row::new(vec!["U1".into(), "Bob".into()])).unwrap());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;
pub mod table;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;
pub use table::{Column, ColumnDefinition, ColumnType, Row, TableSchema};

/// A lazy, finite, one-pass sequence of rows.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Single-blob-per-key state storage.
///
/// Writes are last-write-wins; there is no compare-and-set.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored at `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` at `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Structured table storage with key-checked inserts.
pub trait IndexedTable: Send + Sync {
    /// Whether a table named `name` has been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn table_exists(&self, name: &str) -> Result<bool>;

    /// Create a table.
    ///
    /// # Errors
    ///
    /// - `StoreError::TableExists` if a table with that name exists.
    /// - `StoreError::SchemaMismatch` if the schema is unusable.
    fn create_table(&self, schema: &TableSchema) -> Result<()>;

    /// Insert a row.
    ///
    /// Returns `false`, without writing, if a row with the same key exists.
    ///
    /// # Errors
    ///
    /// - `StoreError::TableNotFound` if the table does not exist.
    /// - `StoreError::SchemaMismatch` if the row does not fit the schema.
    fn insert_row(&self, table: &str, row: Row) -> Result<bool>;

    /// Get the row with the given key columns.
    ///
    /// Returns an empty row if there is no such row.
    ///
    /// # Errors
    ///
    /// - `StoreError::TableNotFound` if the table does not exist.
    /// - `StoreError::SchemaMismatch` if `key` is not a full key.
    fn get_row(&self, table: &str, key: &[Column]) -> Result<Row>;

    /// Scan rows whose key starts with `key_prefix`, in encoded key order.
    ///
    /// An empty prefix scans the whole table.
    ///
    /// # Errors
    ///
    /// - `StoreError::TableNotFound` if the table does not exist.
    /// - `StoreError::SchemaMismatch` if `key_prefix` is longer than the key.
    fn get_rows(&self, table: &str, key_prefix: &[Column]) -> Result<RowIter<'_>>;
}
