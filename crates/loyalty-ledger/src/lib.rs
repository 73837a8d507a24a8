//! Loyalty points ledger.
//!
//! [`AccountLedger`] registers user accounts and adjusts their point
//! balances against two independent storage representations:
//!
//! - the **blob path**: one JSON document per `ffid` in a [`KeyValueStore`]
//! - the **table path**: one row per `ffid` in the `UserTable` of an
//!   [`IndexedTable`]
//!
//! The two are not synchronized. `RegisterUser` writes only the blob,
//! `RegisterUserDetails` only the row, and point adjustments only ever touch
//! the blob.
//!
//! Every operation is a fresh read-validate-write cycle against the stores;
//! the ledger keeps no account state between calls.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use loyalty_ledger::AccountLedger;
//! use loyalty_store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let ledger = AccountLedger::new(store.clone(), store);
//! ledger.init().unwrap();
//!
//! let args: Vec<String> = [
//!     "U1", "Ada", "Lovelace", "1815-12-10", "ada@example.com", "London", "UK",
//!     "London", "SW1", "admin", "Ms", "F", "100",
//! ]
//! .iter()
//! .map(ToString::to_string)
//! .collect();
//! ledger.invoke("RegisterUser", &args).unwrap();
//!
//! let points = ledger.query("getPoints", &["U1".to_string()]).unwrap();
//! assert_eq!(points, b"100");
//! ```
//!
//! [`KeyValueStore`]: loyalty_store::KeyValueStore
//! [`IndexedTable`]: loyalty_store::IndexedTable

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dispatch;
pub mod ledger;
pub mod migrate;
pub mod repository;

pub use dispatch::{InvokeFunction, QueryFunction};
pub use ledger::{AccountLedger, CountResult};
pub use migrate::{user_table_schema, SENTINEL_KEY, USER_TABLE};
pub use repository::{AccountRepository, BlobRepository, TableRepository};
