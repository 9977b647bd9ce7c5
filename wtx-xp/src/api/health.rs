//! Liveness endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

const MODULE_NAME: &str = "wtx-xp";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
