//! Error types for wtx-ui
//!
//! Variants keep the cause for logs; the user only ever sees one generic
//! message per failure kind.

use thiserror::Error;

/// Fetching extracted fields failed
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Could not reach the proxy, or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// Proxy or upstream answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not a `{ processed_text }` envelope
    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    /// `processed_text` is not a JSON field document
    #[error("Malformed extracted fields: {0}")]
    Fields(String),
}

/// Storing a ticket record failed
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Could not reach the persistence service
    #[error("Network error: {0}")]
    Network(String),

    /// Persistence service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}
