//! Error types for wtx-xp

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Invalid forwarding rule configuration
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid proxy prefix '{0}': must be empty or start with '/'")]
    Prefix(String),

    #[error("Invalid upstream origin {0}")]
    Upstream(String),
}

/// Per-request forwarding failures
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Path does not match the rule
    #[error("No proxy rule for {0}")]
    NoRoute(String),

    /// Request body could not be read
    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    /// Upstream unreachable or connection dropped
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream response could not be relayed
    #[error("Failed to relay upstream response: {0}")]
    Relay(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::NoRoute(_) => StatusCode::NOT_FOUND,
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::Relay(_) => StatusCode::BAD_GATEWAY,
        };

        if status != StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), error = %self, "Proxy request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
