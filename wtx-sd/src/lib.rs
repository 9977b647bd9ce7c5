//! wtx-sd library - Persistence Service ("save details")
//!
//! Stores each submitted ticket record as a new document. No validation,
//! no deduplication: every accepted request adds one row.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/api/save-details", post(api::save_details))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Browser clients call from another origin
        .layer(CorsLayer::permissive())
}
