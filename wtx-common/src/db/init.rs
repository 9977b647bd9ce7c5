//! Database initialization
//!
//! Opens (creating if needed) the SQLite database named by a connection
//! string and creates the `ticket_details` collection table.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Connect to the store and create tables if needed
///
/// In-memory URLs get a single long-lived connection; every SQLite memory
/// connection is its own database.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let in_memory = is_in_memory(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(5000));

    if in_memory {
        info!("Using in-memory database");
    } else {
        // Create parent directory if it doesn't exist
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("Opening database: {}", options.get_filename().display());
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    let pool = pool_options.connect_with(options).await?;

    create_ticket_details_table(&pool).await?;

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// One row per stored document; no uniqueness beyond the generated guid
async fn create_ticket_details_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ticket_details (
            guid TEXT PRIMARY KEY,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_database_has_table() {
        let pool = init_database("sqlite::memory:").await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_details")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_file_database_created_with_parent_dir() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("wtx.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let pool = init_database(&url).await.unwrap();
        pool.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("wtx.db").display());

        init_database(&url).await.unwrap().close().await;
        let pool = init_database(&url).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_details")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
