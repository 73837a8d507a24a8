//! Common test utilities for loyalty-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::json;

use loyalty_ledger::AccountLedger;
use loyalty_service::{create_router, AppState, ServiceConfig, StorageBackend};
use loyalty_store::MemoryStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The in-memory store behind the ledger.
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    /// Create a new test harness with a fresh, initialized store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let ledger = AccountLedger::new(store.clone(), store.clone());
        ledger.init().expect("Failed to initialize ledger");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            storage_backend: StorageBackend::Memory,
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(ledger), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, store }
    }

    /// Call an invoke function.
    pub async fn invoke(&self, function: &str, args: &[&str]) -> TestResponse {
        self.server
            .post(&format!("/v1/invoke/{function}"))
            .json(&json!({ "args": args }))
            .await
    }

    /// Call a query function.
    pub async fn query(&self, function: &str, args: &[&str]) -> TestResponse {
        self.server
            .post(&format!("/v1/query/{function}"))
            .json(&json!({ "args": args }))
            .await
    }

    /// Register `ffid` with `points` on the blob path.
    pub async fn register(&self, ffid: &str, points: &str) {
        self.invoke("RegisterUser", &registration(ffid, points))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The 13 registration fields for an account.
pub fn registration<'a>(ffid: &'a str, points: &'a str) -> [&'a str; 13] {
    [
        ffid,
        "Ada",
        "Lovelace",
        "1815-12-10",
        "ada@example.com",
        "12 St James's Square",
        "UK",
        "London",
        "SW1Y 4JH",
        "admin",
        "Countess",
        "F",
        points,
    ]
}

/// Error code from a JSON error envelope.
pub fn error_code(response: &TestResponse) -> String {
    let body: serde_json::Value = response.json();
    body["error"]["code"].as_str().unwrap_or_default().to_string()
}
