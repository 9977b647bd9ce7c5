//! Save details endpoint
//!
//! `POST /api/save-details` inserts the body as a new ticket document.
//! - 201 on success
//! - 500 when the body cannot be cast to a ticket record or the insert fails
//! - 400 when the body is not JSON at all

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use wtx_common::db::insert_detail;
use wtx_common::TicketRecord;

use crate::AppState;

/// Success body
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
}

/// POST /api/save-details
pub async fn save_details(
    State(state): State<AppState>,
    payload: Result<Json<TicketRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveResponse>), SaveError> {
    let Json(record) = payload.map_err(SaveError::from)?;

    let guid = insert_detail(&state.db, &record)
        .await
        .map_err(|e| SaveError::Storage(e.to_string()))?;

    info!(
        guid = %guid,
        ticket_number = record.ticket_number.as_deref().unwrap_or("-"),
        "Saved ticket details"
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            message: "Details saved successfully!".to_string(),
        }),
    ))
}

/// Save endpoint errors
#[derive(Debug)]
pub enum SaveError {
    /// Body is not parseable JSON (or wrong content type)
    BadRequest(String),
    /// Field cast or insert failed
    Storage(String),
}

impl From<JsonRejection> for SaveError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON that does not fit the record, e.g. an object
            // in a text field, fails like a storage cast error
            JsonRejection::JsonDataError(e) => SaveError::Storage(e.body_text()),
            other => SaveError::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for SaveError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self {
            SaveError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, "Invalid request body", error)
            }
            SaveError::Storage(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save details", error)
            }
        };

        warn!(status = status.as_u16(), error = %error, "{}", message);

        let body = Json(json!({
            "message": message,
            "error": error,
        }));

        (status, body).into_response()
    }
}
