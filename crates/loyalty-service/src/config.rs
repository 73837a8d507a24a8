//! Service configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::StartupError;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Persistent `RocksDB` database under `data_dir`.
    RocksDb,
    /// Process-local, lost on exit.
    Memory,
}

impl StorageBackend {
    /// Backend used when `STORAGE_BACKEND` is unset.
    #[must_use]
    pub const fn default_for_build() -> Self {
        if cfg!(feature = "rocksdb-backend") {
            Self::RocksDb
        } else {
            Self::Memory
        }
    }
}

impl FromStr for StorageBackend {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rocksdb" => Ok(Self::RocksDb),
            "memory" => Ok(Self::Memory),
            other => Err(StartupError::Config(format!(
                "unknown STORAGE_BACKEND {other:?}: expected \"rocksdb\" or \"memory\""
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RocksDb => "rocksdb",
            Self::Memory => "memory",
        })
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/loyalty-ledger").
    pub data_dir: String,

    /// Storage backend.
    pub storage_backend: StorageBackend,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` if `STORAGE_BACKEND` names an unknown
    /// backend.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset or unparseable values.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` if `STORAGE_BACKEND` names an unknown
    /// backend.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.storage_backend,
        };

        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: lookup("DATA_DIR").unwrap_or(defaults.data_dir),
            storage_backend,
            cors_origins: lookup("CORS_ORIGINS").map_or(defaults.cors_origins, |raw| {
                raw.split(',').map(|s| s.trim().to_string()).collect()
            }),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/loyalty-ledger".into(),
            storage_backend: StorageBackend::default_for_build(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, StartupError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = load(&[]).unwrap();
        let defaults = ServiceConfig::default();

        assert_eq!(config.listen_addr, defaults.listen_addr);
        assert_eq!(config.data_dir, "/data/loyalty-ledger");
        assert_eq!(config.storage_backend, StorageBackend::default_for_build());
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATA_DIR", "/tmp/ledger"),
            ("STORAGE_BACKEND", "Memory"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("MAX_BODY_BYTES", "2048"),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.data_dir, "/tmp/ledger");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.max_body_bytes, 2048);
        assert_eq!(config.request_timeout_seconds, 5);
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        let config = load(&[("MAX_BODY_BYTES", "lots"), ("REQUEST_TIMEOUT_SECONDS", "-1")]).unwrap();
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            load(&[("STORAGE_BACKEND", "postgres")]),
            Err(StartupError::Config(_))
        ));
    }
}
