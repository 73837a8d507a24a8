//! Account repositories.
//!
//! The same `Account` can be persisted two ways, and the two are deliberately
//! independent: registering through one leaves the other untouched.
//!
//! | | `BlobRepository` | `TableRepository` |
//! |---|---|---|
//! | backend | `KeyValueStore` | `IndexedTable` (`UserTable`) |
//! | encoding | one JSON document per `ffid` | one 13-column row per `ffid` |
//! | re-registration | overwrites | rejected with `DuplicateKey` |

use std::sync::Arc;

use loyalty_core::{Account, Ffid, LedgerError, Result, FIELD_COUNT};
use loyalty_store::{Column, IndexedTable, KeyValueStore, Row};

use crate::migrate::USER_TABLE;

/// Persistence capability shared by both account representations.
pub trait AccountRepository: Send + Sync {
    /// Persist a newly registered account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreWrite` if the backend write fails, and
    /// `LedgerError::DuplicateKey` if the backend refuses existing keys.
    fn register(&self, account: &Account) -> Result<()>;

    /// Load an account.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NotFound` if there is no account for `ffid`.
    /// - `LedgerError::StoreRead` if the backend read fails.
    /// - `LedgerError::Deserialization` if the stored record is malformed.
    fn find(&self, ffid: &Ffid) -> Result<Account>;
}

/// Accounts as JSON blobs in a key-value store, keyed by `ffid`.
#[derive(Clone)]
pub struct BlobRepository {
    store: Arc<dyn KeyValueStore>,
}

impl BlobRepository {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored bytes for `ffid`, verbatim.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NotFound` if the key is absent.
    /// - `LedgerError::StoreRead` if the read fails.
    pub fn raw(&self, ffid: &Ffid) -> Result<Vec<u8>> {
        self.store
            .get(ffid.as_str())
            .map_err(|e| LedgerError::StoreRead(format!("failed to get state for {ffid}: {e}")))?
            .ok_or_else(|| LedgerError::NotFound(format!("no state for {ffid}")))
    }

    /// Write `account`, replacing whatever is stored at its key.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreWrite` if the write fails.
    pub fn save(&self, account: &Account) -> Result<()> {
        let bytes = account.to_json()?;
        self.store.put(account.ffid.as_str(), &bytes).map_err(|e| {
            LedgerError::StoreWrite(format!("could not save account {}: {e}", account.ffid))
        })
    }
}

impl AccountRepository for BlobRepository {
    fn register(&self, account: &Account) -> Result<()> {
        self.save(account)
    }

    fn find(&self, ffid: &Ffid) -> Result<Account> {
        Account::from_json(&self.raw(ffid)?)
    }
}

/// Accounts as rows of `UserTable`.
#[derive(Clone)]
pub struct TableRepository {
    table: Arc<dyn IndexedTable>,
}

impl TableRepository {
    /// Create a repository over `table`.
    #[must_use]
    pub fn new(table: Arc<dyn IndexedTable>) -> Self {
        Self { table }
    }

    /// Count rows of `UserTable` that have at least one column.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreRead` if the scan fails.
    pub fn count(&self) -> Result<u64> {
        let rows = self
            .table
            .get_rows(USER_TABLE, &[])
            .map_err(|e| LedgerError::StoreRead(format!("failed to retrieve rows: {e}")))?;

        let mut count = 0;
        for row in rows {
            let row =
                row.map_err(|e| LedgerError::StoreRead(format!("failed to retrieve row: {e}")))?;
            if !row.is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Map an account onto `UserTable` columns.
fn account_row(account: &Account) -> Row {
    Row::new(
        account
            .clone()
            .into_fields()
            .into_iter()
            .map(Column::String)
            .collect(),
    )
}

/// Map a `UserTable` row back onto an account, column by column.
fn row_account(row: Row) -> Result<Account> {
    let got = row.columns.len();
    let fields: Vec<String> = row
        .columns
        .into_iter()
        .map(|column| match column {
            Column::String(value) => Ok(value),
            other => Err(LedgerError::Deserialization(format!(
                "expected string column, got {:?}",
                other.column_type()
            ))),
        })
        .collect::<Result<_>>()?;

    let fields: [String; FIELD_COUNT] = fields.try_into().map_err(|_| {
        LedgerError::Deserialization(format!("expected {FIELD_COUNT} columns, got {got}"))
    })?;

    Account::from_fields(fields).map_err(|e| LedgerError::Deserialization(e.to_string()))
}

impl AccountRepository for TableRepository {
    fn register(&self, account: &Account) -> Result<()> {
        let inserted = self
            .table
            .insert_row(USER_TABLE, account_row(account))
            .map_err(|e| LedgerError::StoreWrite(format!("insert into {USER_TABLE} failed: {e}")))?;

        if !inserted {
            return Err(LedgerError::DuplicateKey {
                key: account.ffid.to_string(),
            });
        }
        Ok(())
    }

    fn find(&self, ffid: &Ffid) -> Result<Account> {
        let row = self
            .table
            .get_row(USER_TABLE, &[Column::from(ffid.as_str())])
            .map_err(|e| {
                LedgerError::StoreRead(format!("failed to get the data for {ffid}: {e}"))
            })?;

        if row.is_empty() {
            return Err(LedgerError::NotFound(format!("no {USER_TABLE} row for {ffid}")));
        }

        row_account(row)
    }
}
