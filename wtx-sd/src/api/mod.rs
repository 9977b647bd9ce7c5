//! HTTP API handlers for wtx-sd

pub mod details;
pub mod health;

pub use details::{save_details, SaveError, SaveResponse};
pub use health::health_routes;
