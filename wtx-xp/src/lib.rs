//! wtx-xp library - Extraction Proxy
//!
//! Forwards requests under a path prefix to the extraction upstream with the
//! prefix stripped, and relays the upstream response verbatim. No retry,
//! timeout, or caching is added on top of what the upstream does.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod rule;

pub use error::{ProxyError, RuleError};
pub use rule::ProxyRule;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Outbound client; redirects are relayed, not followed
    pub client: reqwest::Client,
    pub rule: Arc<ProxyRule>,
}

impl AppState {
    /// Create new application state with a client suited to relaying
    pub fn new(rule: ProxyRule) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            rule: Arc::new(rule),
        })
    }
}

/// Build application router
///
/// `/health` is served locally; every other path goes through the rule.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .fallback(api::forward)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
