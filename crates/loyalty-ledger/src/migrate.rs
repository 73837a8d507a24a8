//! Table schema setup.
//!
//! `UserTable` must exist before the table path can serve traffic. Setup is
//! idempotent and is run once at startup.

use loyalty_core::{LedgerError, Result};
use loyalty_store::{ColumnDefinition, IndexedTable, KeyValueStore, StoreError, TableSchema};

/// Name of the account table.
pub const USER_TABLE: &str = "UserTable";

/// State key written when the account table is first created.
pub const SENTINEL_KEY: &str = "userId";

/// Column names of `UserTable`, in row order. `ffid` is the only key.
pub const USER_TABLE_COLUMNS: [&str; 13] = [
    "ffid",
    "firstName",
    "lastName",
    "dob",
    "email",
    "address",
    "country",
    "city",
    "zip",
    "createdBy",
    "title",
    "gender",
    "points",
];

/// Schema of the account table.
#[must_use]
pub fn user_table_schema() -> TableSchema {
    let columns = USER_TABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                ColumnDefinition::string_key(*name)
            } else {
                ColumnDefinition::string(*name)
            }
        })
        .collect();

    TableSchema::new(USER_TABLE, columns)
}

/// Create `UserTable` and write the sentinel key if the table is missing.
///
/// Returns `true` if the table was created by this call.
///
/// # Errors
///
/// Returns `LedgerError::StoreRead` if the existence check fails and
/// `LedgerError::StoreWrite` if creating the table or the sentinel fails.
pub fn ensure_schema(tables: &dyn IndexedTable, state: &dyn KeyValueStore) -> Result<bool> {
    let exists = tables
        .table_exists(USER_TABLE)
        .map_err(|e| LedgerError::StoreRead(format!("checking {USER_TABLE}: {e}")))?;
    if exists {
        tracing::debug!(table = USER_TABLE, "Table already exists");
        return Ok(false);
    }

    match tables.create_table(&user_table_schema()) {
        Ok(()) => {}
        // Lost a race with another initializer; the table is there.
        Err(StoreError::TableExists { .. }) => return Ok(false),
        Err(e) => {
            return Err(LedgerError::StoreWrite(format!(
                "failed creating {USER_TABLE}: {e}"
            )))
        }
    }

    state
        .put(SENTINEL_KEY, SENTINEL_KEY.as_bytes())
        .map_err(|e| LedgerError::StoreWrite(format!("writing {SENTINEL_KEY}: {e}")))?;

    tracing::info!(table = USER_TABLE, "Table created");
    Ok(true)
}
