//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use loyalty_core::LedgerError;
use loyalty_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A ledger operation failed.
    #[error(transparent)]
    Ledger(LedgerError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Schema setup failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Serialization(msg) => Self::Internal(msg),
            other => Self::Ledger(other),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// HTTP status for a ledger error.
fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::InvalidArgumentCount { .. }
        | LedgerError::InvalidId(_)
        | LedgerError::UnknownOperation { .. }
        | LedgerError::UnknownOperator(_)
        | LedgerError::InvalidAmount(_)
        | LedgerError::InvalidBalance(_)
        | LedgerError::BalanceOverflow { .. } => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::DuplicateKey { .. } => StatusCode::CONFLICT,
        LedgerError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
        LedgerError::StoreRead(_)
        | LedgerError::StoreWrite(_)
        | LedgerError::Deserialization(_)
        | LedgerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Ledger(err) => {
                let status = ledger_status(err);
                let details = match err {
                    LedgerError::InsufficientBalance { balance, required } => {
                        Some(serde_json::json!({
                            "balance": balance,
                            "required": required
                        }))
                    }
                    LedgerError::InvalidArgumentCount {
                        function,
                        expected,
                        got,
                    } => Some(serde_json::json!({
                        "function": function,
                        "expected": expected.to_string(),
                        "got": got
                    })),
                    _ => None,
                };

                if status.is_server_error() {
                    tracing::error!(error = %err, "Ledger operation failed");
                }
                (status, err.code(), err.to_string(), details)
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
