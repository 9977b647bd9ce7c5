//! Persistence service client
//!
//! `POST <save_url>` with the normalized record. Any 2xx counts as saved.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use wtx_common::ticket::TicketRecord;

use super::{DetailsSink, USER_AGENT};
use crate::error::PersistenceError;

/// Error body returned by the persistence service
#[derive(Debug, Deserialize)]
struct SaveErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP client for the persistence service
pub struct PersistenceClient {
    http_client: reqwest::Client,
    save_url: String,
}

impl PersistenceClient {
    pub fn new(save_url: impl Into<String>) -> Result<Self, PersistenceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PersistenceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            save_url: save_url.into(),
        })
    }

    pub fn save_url(&self) -> &str {
        &self.save_url
    }
}

#[async_trait]
impl DetailsSink for PersistenceClient {
    async fn save(&self, record: &TicketRecord) -> Result<(), PersistenceError> {
        debug!(url = %self.save_url, "Saving ticket details");

        let response = self
            .http_client
            .post(&self.save_url)
            .json(record)
            .send()
            .await
            .map_err(|e| PersistenceError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        // Prefer the storage error, then the summary, then the raw body
        let message = match serde_json::from_str::<SaveErrorBody>(&text) {
            Ok(SaveErrorBody { error: Some(error), .. }) => error,
            Ok(SaveErrorBody { message: Some(message), .. }) => message,
            _ => text,
        };

        Err(PersistenceError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
