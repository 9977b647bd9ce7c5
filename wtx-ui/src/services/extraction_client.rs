//! Extraction proxy client
//!
//! `POST <extract_url>` with `{ "image_url": ... }`, expecting
//! `{ "processed_text": "<JSON of extracted fields>" }`. No retry and no
//! request timeout.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use wtx_common::ticket::{ExtractedFields, ExtractionEnvelope};

use super::{ExtractionSource, USER_AGENT};
use crate::error::ExtractionError;

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    image_url: &'a str,
}

/// HTTP client for the extraction proxy
pub struct ExtractionClient {
    http_client: reqwest::Client,
    extract_url: String,
}

impl ExtractionClient {
    pub fn new(extract_url: impl Into<String>) -> Result<Self, ExtractionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            extract_url: extract_url.into(),
        })
    }

    pub fn extract_url(&self) -> &str {
        &self.extract_url
    }
}

#[async_trait]
impl ExtractionSource for ExtractionClient {
    async fn extract(&self, image_url: &str) -> Result<ExtractedFields, ExtractionError> {
        debug!(image_url = image_url, url = %self.extract_url, "Requesting extraction");

        let response = self
            .http_client
            .post(&self.extract_url)
            .json(&ExtractRequest { image_url })
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ExtractionEnvelope =
            serde_json::from_str(&body).map_err(|e| ExtractionError::Envelope(e.to_string()))?;

        envelope
            .fields()
            .map_err(|e| ExtractionError::Fields(e.to_string()))
    }
}
