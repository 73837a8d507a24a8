//! Application state.

use std::sync::Arc;

use loyalty_ledger::AccountLedger;
use loyalty_store::MemoryStore;

use crate::config::{ServiceConfig, StorageBackend};
use crate::error::StartupError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The account ledger.
    pub ledger: Arc<AccountLedger>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(ledger: Arc<AccountLedger>, config: ServiceConfig) -> Self {
        Self { ledger, config }
    }
}

/// Open the configured backend and ensure the account table exists.
///
/// # Errors
///
/// Returns `StartupError::Store` if the backend cannot be opened,
/// `StartupError::Config` if it was not compiled in, and
/// `StartupError::Ledger` if schema setup fails.
pub fn open_ledger(config: &ServiceConfig) -> Result<AccountLedger, StartupError> {
    let ledger = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store - data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            AccountLedger::new(store.clone(), store)
        }
        #[cfg(feature = "rocksdb-backend")]
        StorageBackend::RocksDb => {
            tracing::info!(path = %config.data_dir, "Opening RocksDB store");
            let store = Arc::new(loyalty_store::RocksStore::open(&config.data_dir)?);
            AccountLedger::new(store.clone(), store)
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        StorageBackend::RocksDb => {
            return Err(StartupError::Config(
                "RocksDB backend not compiled in; rebuild with the rocksdb-backend feature".into(),
            ))
        }
    };

    let created = ledger.init()?;
    tracing::info!(backend = %config.storage_backend, table_created = created, "Ledger ready");

    Ok(ledger)
}
