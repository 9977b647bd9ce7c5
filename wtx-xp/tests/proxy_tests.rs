//! Integration tests for the extraction proxy
//!
//! Each test starts a throwaway upstream on 127.0.0.1:0 and drives the
//! proxy router with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use wtx_common::ticket::{normalize, ExtractionEnvelope};
use wtx_xp::{build_router, AppState, ProxyRule};

const EXTRACT_RESPONSE: &str =
    r#"{"processed_text":"{\"Waste Name\":\"Concrete\",\"Gross Weight\":\"100\",\"Tare Weight\":null}"}"#;

async fn echo(request: axum::extract::Request) -> Json<Value> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "host": header("host"),
        "x_request_id": header("x-request-id"),
        "body": String::from_utf8_lossy(&bytes),
    }))
}

/// Test helper: start a fake extraction upstream, return its origin
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route(
            "/extract-details",
            post(|| async { ([(header::CONTENT_TYPE, "application/json")], EXTRACT_RESPONSE) }),
        )
        .route("/echo", any(echo))
        .route("/redirect", get(|| async { Redirect::temporary("/elsewhere") }))
        .route(
            "/teapot",
            get(|| async {
                (StatusCode::IM_A_TEAPOT, [("x-upstream", "yes")], "short and stout").into_response()
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn proxy_app(origin: &str) -> Router {
    let rule = ProxyRule::new("/api", origin).unwrap();
    build_router(AppState::new(rule).unwrap())
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

#[tokio::test]
async fn test_extract_details_relayed_verbatim() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .method("POST")
        .uri("/api/extract-details")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "image_url": "https://example.com/ticket.png" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let bytes = body_bytes(response.into_body()).await;
    assert_eq!(bytes, EXTRACT_RESPONSE.as_bytes());

    // Envelope decodes into fields that normalize as expected
    let envelope: ExtractionEnvelope = serde_json::from_slice(&bytes).unwrap();
    let record = normalize(envelope.fields().unwrap());
    assert_eq!(record.net_weight.as_deref(), Some("100 KG"));
}

#[tokio::test]
async fn test_prefix_stripped_and_request_forwarded() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .method("PUT")
        .uri("/api/echo?lang=en&page=2")
        .header("host", "frontend.local:5173")
        .header("x-request-id", "req-42")
        .body(Body::from("raw payload"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["path"], "/echo");
    assert_eq!(body["query"], "lang=en&page=2");
    assert_eq!(body["x_request_id"], "req-42");
    assert_eq!(body["body"], "raw payload");

    // Host rewritten to the upstream origin
    let upstream_host = origin.trim_start_matches("http://");
    assert_eq!(body["host"], upstream_host);
}

#[tokio::test]
async fn test_upstream_status_and_headers_passed_back() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .uri("/api/teapot")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers()["x-upstream"], "yes");
    assert_eq!(body_bytes(response.into_body()).await, b"short and stout");
}

#[tokio::test]
async fn test_redirects_relayed_not_followed() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .uri("/api/redirect")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/elsewhere");
}

#[tokio::test]
async fn test_non_matching_path_is_not_found() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .method("POST")
        .uri("/extract-details")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("/extract-details"));
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let app = proxy_app(&origin);

    let request = Request::builder()
        .method("POST")
        .uri("/api/extract-details")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health_served_locally() {
    let origin = spawn_upstream().await;
    let app = proxy_app(&origin);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["module"], "wtx-xp");
}
