//! Loyalty ledger HTTP service.
//!
//! Exposes the [`AccountLedger`](loyalty_ledger::AccountLedger) function
//! surface over HTTP:
//!
//! - `POST /v1/invoke/:function` for `Init`, `RegisterUser`,
//!   `RegisterUserDetails` and `AddDeletePoints`
//! - `POST /v1/query/:function` for `getUser`, `getPoints`,
//!   `GetUserDetails` and `GetUserCount`
//!
//! Request bodies are `{"args": [...]}`; successful responses carry the raw
//! result bytes of the operation. Failures use the JSON error envelope
//! described in [`ApiError`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Ledger calls are synchronous

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ServiceConfig, StorageBackend};
pub use error::{ApiError, StartupError};
pub use routes::create_router;
pub use state::{open_ledger, AppState};
