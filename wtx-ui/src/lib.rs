//! wtx-ui library - Client UI
//!
//! Terminal rendition of the ticket form: validate an image URL, fetch
//! extracted fields through the proxy, normalize them, show them as a
//! labeled card and a pie chart, then store them.
//!
//! State lives in [`session::Session`], an explicit state machine whose
//! current value is published on a `tokio::sync::watch` channel.

pub mod chart;
pub mod error;
pub mod render;
pub mod services;
pub mod session;

pub use error::{ExtractionError, PersistenceError};
pub use services::{DetailsSink, ExtractionClient, ExtractionSource, PersistenceClient};
pub use session::{Notification, NotificationLevel, SaveOutcome, Session, SessionState, Status};
