//! Network seams of the client
//!
//! The session talks to the proxy and the persistence service only through
//! these traits, so tests can swap in in-process fakes.

pub mod extraction_client;
pub mod persistence_client;

use async_trait::async_trait;
use wtx_common::ticket::{ExtractedFields, TicketRecord};

use crate::error::{ExtractionError, PersistenceError};

pub use extraction_client::ExtractionClient;
pub use persistence_client::PersistenceClient;

/// Source of extracted ticket fields for an image
#[async_trait]
pub trait ExtractionSource: Send + Sync {
    async fn extract(&self, image_url: &str) -> Result<ExtractedFields, ExtractionError>;
}

/// Destination for normalized ticket records
#[async_trait]
pub trait DetailsSink: Send + Sync {
    async fn save(&self, record: &TicketRecord) -> Result<(), PersistenceError>;
}

/// User agent sent by both clients
pub(crate) const USER_AGENT: &str = concat!("wtx-ui/", env!("CARGO_PKG_VERSION"));
