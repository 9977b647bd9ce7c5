//! Request forwarding
//!
//! Method, headers, query, and body go upstream unchanged except for:
//! - `Host`, which is set from the upstream origin
//! - hop-by-hop headers, which are dropped in both directions

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName},
    response::Response,
};
use tracing::info;

use crate::{AppState, ProxyError};

/// Largest request body relayed upstream
const MAX_FORWARD_BODY: usize = 32 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Fallback handler: forward anything the rule matches
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path();

    let target = state
        .rule
        .target_url(path, parts.uri.query())
        .ok_or_else(|| ProxyError::NoRoute(path.to_string()))?;

    let body = axum::body::to_bytes(body, MAX_FORWARD_BODY)
        .await
        .map_err(|e| ProxyError::RequestBody(e.to_string()))?;

    let mut headers = parts.headers.clone();
    strip_hop_by_hop(&mut headers);
    // Recomputed by the client for the outbound request
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    let upstream = state
        .client
        .request(parts.method.clone(), &target)
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    response_headers.remove(header::CONTENT_LENGTH);

    let bytes = upstream.bytes().await?;

    info!(
        method = %parts.method,
        path = %path,
        target = %target,
        status = status.as_u16(),
        bytes = bytes.len(),
        "Forwarded request"
    );

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(bytes))
        .map_err(|e| ProxyError::Relay(e.to_string()))?;
    *response.headers_mut() = response_headers;

    Ok(response)
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers listed in Connection are hop-by-hop too
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}
