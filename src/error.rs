//! Error types for the dashboard query layer
//!
//! One taxonomy shared by the executor, the cache and the gateway. Errors are
//! `Clone` so a single shared fetch can hand the same failure to every waiter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Dashboard Error Enum ==
/// Unified error type for fetches, mutations and local validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Network failure or timeout before a status was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a 5xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Backend rejected the request (4xx, or an envelope with `success: false`)
    #[error("{message}")]
    Client { status: u16, message: String },

    /// Local form/schema check failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Body did not match the expected response envelope
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Internal failure (abandoned fetch, bad configuration)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    // == Retry Classification ==
    /// Returns true for failures worth repeating unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DashboardError::Transport(_) | DashboardError::Server { .. }
        )
    }

    /// Short machine-readable name for logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Transport(_) => "transport",
            DashboardError::Server { .. } => "server",
            DashboardError::Client { .. } => "client",
            DashboardError::Validation(_) => "validation",
            DashboardError::Decode(_) => "decode",
            DashboardError::Internal(_) => "internal",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Transport(_)
            | DashboardError::Server { .. }
            | DashboardError::Decode(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Client { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error())
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the dashboard query layer.
pub type Result<T> = std::result::Result<T, DashboardError>;
