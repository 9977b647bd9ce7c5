//! # WTX Common Library
//!
//! Shared code for the WTX services:
//! - Ticket data model and normalization of upstream extraction output
//! - Image URL validation used by the client form
//! - Bootstrap configuration loading
//! - Document store (SQLite) initialization and inserts

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod image_url;
pub mod ticket;

pub use error::{Error, Result};
pub use ticket::{ExtractedFields, TicketRecord};
