//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `KeyValueStore`
//! and `IndexedTable` traits.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode, MultiThreaded, Options};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::table::{Column, Row, TableSchema};
use crate::{IndexedTable, KeyValueStore, RowIter};

/// RocksDB-backed storage implementation.
///
/// Key-value state is stored verbatim; schemas and rows are CBOR-encoded.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Held across every check-then-write sequence.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Serialize check-then-write sequences.
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("lock poisoned".into()))
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load a table schema.
    fn schema(&self, table: &str) -> Result<TableSchema> {
        let cf = self.cf(cf::TABLES)?;

        self.db
            .get_cf(&cf, keys::table_key(table))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()?
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.to_string(),
            })
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(cf::STATE)?;

        self.db
            .get_cf(&cf, keys::state_key(key))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let cf = self.cf(cf::STATE)?;

        self.db
            .put_cf(&cf, keys::state_key(key), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl IndexedTable for RocksStore {
    fn table_exists(&self, name: &str) -> Result<bool> {
        let cf = self.cf(cf::TABLES)?;

        let exists = self
            .db
            .get_cf(&cf, keys::table_key(name))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    fn create_table(&self, schema: &TableSchema) -> Result<()> {
        schema.validate()?;

        let _guard = self.lock_writes()?;
        if self.table_exists(&schema.name)? {
            return Err(StoreError::TableExists {
                table: schema.name.clone(),
            });
        }

        let cf = self.cf(cf::TABLES)?;
        let value = Self::serialize(schema)?;

        self.db
            .put_cf(&cf, keys::table_key(&schema.name), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(table = %schema.name, columns = schema.columns.len(), "Table created");
        Ok(())
    }

    fn insert_row(&self, table: &str, row: Row) -> Result<bool> {
        let schema = self.schema(table)?;
        let key_columns = schema.row_key(&row)?;

        let cf = self.cf(cf::ROWS)?;
        let key = keys::row_key(table, &key_columns);

        let _guard = self.lock_writes()?;

        let exists = self
            .db
            .get_pinned_cf(&cf, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if exists {
            return Ok(false);
        }

        let value = Self::serialize(&row)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(true)
    }

    fn get_row(&self, table: &str, key: &[Column]) -> Result<Row> {
        let schema = self.schema(table)?;
        schema.check_key(key, true)?;

        let cf = self.cf(cf::ROWS)?;

        Ok(self
            .db
            .get_cf(&cf, keys::row_key(table, key))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()?
            .unwrap_or_default())
    }

    fn get_rows(&self, table: &str, key_prefix: &[Column]) -> Result<RowIter<'_>> {
        let schema = self.schema(table)?;
        schema.check_key(key_prefix, false)?;

        let cf = self.cf(cf::ROWS)?;
        let prefix = keys::row_key(table, key_prefix);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let rows = iter
            .map(|item| item.map_err(|e| StoreError::Database(e.to_string())))
            .take_while(move |item| match item {
                Ok((key, _)) => key.starts_with(&prefix),
                Err(_) => true,
            })
            .map(|item| item.and_then(|(_, value)| Self::deserialize::<Row>(&value)));

        Ok(Box::new(rows))
    }
}
