//! Ticket detail documents
//!
//! Documents are append-only: inserted once, never updated or deleted.
//! Inserting the same record twice stores two documents.

use crate::ticket::TicketRecord;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// A stored document with its generated identity
#[derive(Debug, Clone, Serialize)]
pub struct StoredDetail {
    pub guid: Uuid,
    pub record: TicketRecord,
    pub created_at: DateTime<Utc>,
}

/// Insert `record` as a new document and return its guid
pub async fn insert_detail(pool: &SqlitePool, record: &TicketRecord) -> Result<Uuid> {
    let guid = Uuid::new_v4();
    let document = serde_json::to_string(record)?;

    sqlx::query("INSERT INTO ticket_details (guid, document, created_at) VALUES (?, ?, ?)")
        .bind(guid.to_string())
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(guid)
}

/// Number of stored documents
pub async fn count_details(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_details")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// All stored documents in insertion order
pub async fn list_details(pool: &SqlitePool) -> Result<Vec<StoredDetail>> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT guid, document, created_at FROM ticket_details ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(guid, document, created_at)| {
            Ok(StoredDetail {
                guid: Uuid::parse_str(&guid)
                    .map_err(|e| Error::Internal(format!("Bad guid {}: {}", guid, e)))?,
                record: serde_json::from_str(&document)?,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| Error::Internal(format!("Bad timestamp {}: {}", created_at, e)))?
                    .with_timezone(&Utc),
            })
        })
        .collect()
}
