//! Ledger invoke and query handlers.
//!
//! Both take the function name from the path and positional string arguments
//! from the body, and answer with the raw result bytes of the operation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Positional arguments for a ledger function.
#[derive(Debug, Default, Deserialize)]
pub struct ArgsRequest {
    /// Arguments in the order the function expects them.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Wrap operation output as an opaque byte response.
fn bytes_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response()
}

/// Run a mutating ledger function.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Path(function): Path<String>,
    Json(body): Json<ArgsRequest>,
) -> Result<Response, ApiError> {
    let result = state.ledger.invoke(&function, &body.args)?;
    Ok(bytes_response(result))
}

/// Run a read-only ledger function.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Path(function): Path<String>,
    Json(body): Json<ArgsRequest>,
) -> Result<Response, ApiError> {
    let result = state.ledger.query(&function, &body.args)?;
    Ok(bytes_response(result))
}
