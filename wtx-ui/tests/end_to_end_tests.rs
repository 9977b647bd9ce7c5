//! Full pipeline: client -> proxy -> fake extraction upstream, then
//! client -> persistence service backed by in-memory SQLite.

use axum::{routing::post, Router};
use sqlx::SqlitePool;
use wtx_common::db::{count_details, init_database, list_details};
use wtx_ui::{
    ExtractionClient, NotificationLevel, PersistenceClient, SaveOutcome, Session, SessionState,
    Status,
};

const EXTRACT_RESPONSE: &str = r#"{"processed_text":"{\"Date\":\"2024-03-18\",\"Time\":{\"Time In\":\"07:41\",\"Time Out\":\"07:58\"},\"Ticket Number\":\"104882\",\"Waste Name\":\"Mixed C&D\",\"Gross Weight\":\"14560 kg\",\"Tare Weight\":null}"}"#;

const IMAGE: &str = "https://cdn.example.com/tickets/104882.jpg";

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test helper: upstream + proxy, return the client's extract URL
async fn start_extraction() -> String {
    let upstream = Router::new().route(
        "/extract-details",
        post(|| async { ([("content-type", "application/json")], EXTRACT_RESPONSE) }),
    );
    let upstream_origin = serve(upstream).await;

    let rule = wtx_xp::ProxyRule::new("/api", &upstream_origin).unwrap();
    let proxy = wtx_xp::build_router(wtx_xp::AppState::new(rule).unwrap());
    format!("{}/api/extract-details", serve(proxy).await)
}

/// Test helper: persistence service, return its pool and save URL
async fn start_persistence() -> (SqlitePool, String) {
    let pool = init_database("sqlite::memory:").await.unwrap();
    let app = wtx_sd::build_router(wtx_sd::AppState::new(pool.clone()));
    let origin = serve(app).await;
    (pool, format!("{}/api/save-details", origin))
}

#[tokio::test]
async fn test_submit_extracts_normalizes_and_stores() {
    let extract_url = start_extraction().await;
    let (pool, save_url) = start_persistence().await;

    let mut session = Session::new(
        ExtractionClient::new(extract_url).unwrap(),
        PersistenceClient::new(save_url).unwrap(),
    );

    assert_eq!(session.submit(IMAGE).await, Ok(Status::Succeeded));

    let state = session.state();
    let record = state.record().unwrap().clone();
    assert_eq!(record.time.as_deref(), Some("07:41 - 07:58"));
    assert_eq!(record.net_weight.as_deref(), Some("14560 KG"));
    assert_eq!(record.tare_weight, None);

    let stored = list_details(&pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].record, record);

    let levels: Vec<_> = session
        .take_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Success, NotificationLevel::Success]);
}

#[tokio::test]
async fn test_same_url_twice_stores_two_documents() {
    let extract_url = start_extraction().await;
    let (pool, save_url) = start_persistence().await;

    let mut session = Session::new(
        ExtractionClient::new(extract_url).unwrap(),
        PersistenceClient::new(save_url).unwrap(),
    );

    session.submit(IMAGE).await.unwrap();
    session.submit(IMAGE).await.unwrap();

    assert_eq!(count_details(&pool).await.unwrap(), 2);

    let stored = list_details(&pool).await.unwrap();
    assert_ne!(stored[0].guid, stored[1].guid);
    assert_eq!(stored[0].record, stored[1].record);
}

#[tokio::test]
async fn test_storage_failure_keeps_record_visible_and_charted() {
    let extract_url = start_extraction().await;
    let (pool, save_url) = start_persistence().await;
    sqlx::query("DROP TABLE ticket_details")
        .execute(&pool)
        .await
        .unwrap();

    let mut session = Session::new(
        ExtractionClient::new(extract_url).unwrap(),
        PersistenceClient::new(save_url).unwrap(),
    );

    assert_eq!(session.submit(IMAGE).await, Ok(Status::Succeeded));

    match session.state() {
        SessionState::Succeeded {
            record,
            chart,
            save,
            ..
        } => {
            assert_eq!(record.waste_name.as_deref(), Some("Mixed C&D"));
            assert_eq!(chart.slices.len(), 1);
            assert_eq!(chart.slices[0].value, Some(14560.0));
            match save {
                SaveOutcome::Failed(reason) => {
                    assert!(reason.starts_with("HTTP 500"));
                    assert!(reason.contains("ticket_details"));
                }
                other => panic!("expected save failure, got {:?}", other),
            }
        }
        other => panic!("unexpected state {:?}", other),
    }

    let last = session.take_notifications().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Failed to save details");
}

#[tokio::test]
async fn test_extraction_failure_through_proxy() {
    // Proxy pointed at an upstream that is not listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let rule = wtx_xp::ProxyRule::new("/api", &dead_origin).unwrap();
    let proxy = wtx_xp::build_router(wtx_xp::AppState::new(rule).unwrap());
    let extract_url = format!("{}/api/extract-details", serve(proxy).await);
    let (pool, save_url) = start_persistence().await;

    let mut session = Session::new(
        ExtractionClient::new(extract_url).unwrap(),
        PersistenceClient::new(save_url).unwrap(),
    );

    assert_eq!(session.submit(IMAGE).await, Ok(Status::Failed));
    assert_eq!(count_details(&pool).await.unwrap(), 0);
}
