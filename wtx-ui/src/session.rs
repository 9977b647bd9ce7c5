//! Submission state machine
//!
//! ```text
//! Idle ──submit──> Loading ──ok──> Succeeded { save: Pending -> Saved | Failed }
//!                          └─err─> Failed
//! ```
//!
//! Each transition replaces the whole state, so a new submission never
//! shows fields from the previous one. Invalid input is rejected before any
//! transition and leaves the current state untouched.
//!
//! Saving only starts after extraction succeeded, and its outcome is
//! recorded inside `Succeeded`: a failed save never hides the record.

use std::fmt;

use tokio::sync::watch;
use tracing::{info, warn};
use wtx_common::image_url::{validate_image_url, ImageUrlError};
use wtx_common::ticket::normalize;
use wtx_common::TicketRecord;

use crate::chart::PieChart;
use crate::services::{DetailsSink, ExtractionSource};

pub const EXTRACT_SUCCESS: &str = "Image details fetched successfully!";
pub const EXTRACT_FAILURE: &str = "Failed to fetch image details";
pub const SAVE_SUCCESS: &str = "Details saved successfully!";
pub const SAVE_FAILURE: &str = "Failed to save details";

/// Coarse status shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
        })
    }
}

/// Result of storing the record of a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Pending,
    Saved,
    Failed(String),
}

/// Everything displayed for the current submission
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        image_url: String,
    },
    Succeeded {
        image_url: String,
        record: TicketRecord,
        chart: PieChart,
        save: SaveOutcome,
    },
    Failed {
        image_url: String,
        error: String,
    },
}

impl SessionState {
    pub fn status(&self) -> Status {
        match self {
            SessionState::Idle => Status::Idle,
            SessionState::Loading { .. } => Status::Loading,
            SessionState::Succeeded { .. } => Status::Succeeded,
            SessionState::Failed { .. } => Status::Failed,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { image_url }
            | SessionState::Succeeded { image_url, .. }
            | SessionState::Failed { image_url, .. } => Some(image_url),
        }
    }

    pub fn record(&self) -> Option<&TicketRecord> {
        match self {
            SessionState::Succeeded { record, .. } => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.to_string(),
        }
    }
}

/// One form, one in-flight submission at a time
pub struct Session<E, S> {
    extractor: E,
    sink: S,
    state: watch::Sender<SessionState>,
    notifications: Vec<Notification>,
}

impl<E: ExtractionSource, S: DetailsSink> Session<E, S> {
    pub fn new(extractor: E, sink: S) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            extractor,
            sink,
            state,
            notifications: Vec::new(),
        }
    }

    /// Observe every state transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Drain toasts raised since the last call
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Validate, extract, normalize, display, then save
    ///
    /// Returns the validation error without touching state or the network
    /// when `input` is not an image URL. Every other failure is absorbed
    /// into the state and notifications.
    pub async fn submit(&mut self, input: &str) -> Result<Status, ImageUrlError> {
        let image_url = validate_image_url(input)?.to_string();

        self.state.send_replace(SessionState::Loading {
            image_url: image_url.clone(),
        });

        let fields = match self.extractor.extract(&image_url).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!(image_url = %image_url, error = %e, "Extraction failed");
                self.state.send_replace(SessionState::Failed {
                    image_url,
                    error: EXTRACT_FAILURE.to_string(),
                });
                self.notifications.push(Notification::error(EXTRACT_FAILURE));
                return Ok(Status::Failed);
            }
        };

        let record = normalize(fields);
        let chart = PieChart::from_records(std::slice::from_ref(&record));
        info!(
            image_url = %image_url,
            ticket_number = record.ticket_number.as_deref().unwrap_or("-"),
            "Extracted ticket details"
        );

        self.state.send_replace(SessionState::Succeeded {
            image_url,
            record: record.clone(),
            chart,
            save: SaveOutcome::Pending,
        });
        self.notifications.push(Notification::success(EXTRACT_SUCCESS));

        let outcome = match self.sink.save(&record).await {
            Ok(()) => {
                self.notifications.push(Notification::success(SAVE_SUCCESS));
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(error = %e, "Saving ticket details failed");
                self.notifications.push(Notification::error(SAVE_FAILURE));
                SaveOutcome::Failed(e.to_string())
            }
        };

        self.state.send_modify(|state| {
            if let SessionState::Succeeded { save, .. } = state {
                *save = outcome;
            }
        });

        Ok(Status::Succeeded)
    }
}
