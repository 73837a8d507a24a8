//! In-memory storage backend for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::table::{Column, Row, TableSchema};
use crate::{IndexedTable, KeyValueStore, RowIter};

/// A table held in memory: its schema and rows ordered by encoded key.
struct MemoryTable {
    schema: TableSchema,
    rows: BTreeMap<Vec<u8>, Row>,
}

/// In-memory implementation of both storage primitives.
///
/// Each primitive call takes the relevant lock once, so individual calls are
/// atomic. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<HashMap<String, Vec<u8>>>,
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.state.write().map_err(|_| poisoned())
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, HashMap<String, MemoryTable>>> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, MemoryTable>>> {
        self.tables.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".into())
}

fn table_not_found(table: &str) -> StoreError {
    StoreError::TableNotFound {
        table: table.to_string(),
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read_state()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write_state()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl IndexedTable for MemoryStore {
    fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.read_tables()?.contains_key(name))
    }

    fn create_table(&self, schema: &TableSchema) -> Result<()> {
        schema.validate()?;

        let mut tables = self.write_tables()?;
        if tables.contains_key(&schema.name) {
            return Err(StoreError::TableExists {
                table: schema.name.clone(),
            });
        }

        tables.insert(
            schema.name.clone(),
            MemoryTable {
                schema: schema.clone(),
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn insert_row(&self, table: &str, row: Row) -> Result<bool> {
        let mut tables = self.write_tables()?;
        let entry = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let key_columns = entry.schema.row_key(&row)?;
        let key = keys::row_key(table, &key_columns);
        if entry.rows.contains_key(&key) {
            return Ok(false);
        }

        entry.rows.insert(key, row);
        Ok(true)
    }

    fn get_row(&self, table: &str, key: &[Column]) -> Result<Row> {
        let tables = self.read_tables()?;
        let entry = tables.get(table).ok_or_else(|| table_not_found(table))?;
        entry.schema.check_key(key, true)?;

        Ok(entry
            .rows
            .get(&keys::row_key(table, key))
            .cloned()
            .unwrap_or_default())
    }

    fn get_rows(&self, table: &str, key_prefix: &[Column]) -> Result<RowIter<'_>> {
        let tables = self.read_tables()?;
        let entry = tables.get(table).ok_or_else(|| table_not_found(table))?;
        entry.schema.check_key(key_prefix, false)?;

        // Snapshot under the lock; the iterator must not hold the guard.
        let prefix = keys::row_key(table, key_prefix);
        let rows: Vec<Row> = entry
            .rows
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, row)| row.clone())
            .collect();

        Ok(Box::new(rows.into_iter().map(Ok::<Row, StoreError>)))
    }
}
