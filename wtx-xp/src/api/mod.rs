//! HTTP handlers for wtx-xp

pub mod forward;
pub mod health;

pub use forward::forward;
pub use health::health_routes;
