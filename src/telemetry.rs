use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use bytes::Bytes;
use tracing::{error, info, warn, Span};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::extractors::REQUEST_ID_HEADER;

// Only this much of a failed response body goes into the log line.
const MAX_LOGGED_BODY: usize = 64 * 1024;

pub fn init_tracing(config: &AppConfig) {
    let env_filter = config.log_filter();

    if config.json_logs() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Logs one line per request. The request id comes from `X-Request-ID` or is
/// generated here, and is always returned in the response header. Response
/// bodies are only buffered when the status is a failure.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    Span::current().record("request_id", tracing::field::display(&request_id));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status < 400 {
        info!(%request_id, %method, %path, %client_ip, status, latency_ms, "request completed");
        return response;
    }

    let (parts, body) = response.into_parts();
    // The client always gets the full body back; only the log copy is capped.
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, %request_id, "could not buffer error response body");
            Bytes::new()
        }
    };
    let logged = &bytes[..bytes.len().min(MAX_LOGGED_BODY)];
    error!(
        %request_id,
        %method,
        %path,
        %client_ip,
        status,
        latency_ms,
        error_response = %String::from_utf8_lossy(logged),
        truncated = bytes.len() > MAX_LOGGED_BODY,
        "request failed"
    );
    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/fail",
                get(|| async { (StatusCode::BAD_REQUEST, r#"{"error_code":"X"}"#) }),
            )
            .route(
                "/huge",
                get(|| async { (StatusCode::BAD_REQUEST, "x".repeat(MAX_LOGGED_BODY + 6 * 1024)) }),
            )
            .layer(middleware::from_fn(log_requests))
    }

    #[tokio::test]
    async fn echoes_inbound_request_id() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/ok")
                    .header("X-Request-ID", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn generates_request_id_when_missing() {
        let res = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = res.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn failure_body_survives_buffering() {
        let res = app()
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error_code":"X"}"#);
    }

    #[tokio::test]
    async fn oversized_failure_body_is_returned_whole() {
        let res = app()
            .oneshot(Request::builder().uri("/huge").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), MAX_LOGGED_BODY + 6 * 1024);
    }
}
