use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 64;

/// Logs one line per request and echoes a correlation id back to the caller.
pub(super) async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(accepted_request_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let started_at = Instant::now();

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    let status = response.status().as_u16();
    let latency_ms = started_at.elapsed().as_millis() as u64;
    if status >= 500 {
        warn!(%request_id, %method, %route, status, latency_ms, "request failed");
    } else {
        info!(%request_id, %method, %route, status, latency_ms, "request handled");
    }

    response
}

fn accepted_request_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let acceptable = !trimmed.is_empty()
        && trimmed.len() <= MAX_REQUEST_ID_LEN
        && trimmed
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_'));
    acceptable.then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    use super::{REQUEST_ID_HEADER, accepted_request_id, request_logging_middleware};

    fn router() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(request_logging_middleware))
    }

    #[tokio::test]
    async fn echoes_caller_request_id() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "chat-42")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("chat-42")
        );
    }

    #[tokio::test]
    async fn assigns_request_id_when_missing() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        let assigned = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("request id should be set");
        assert_eq!(assigned.len(), 36);
    }

    #[test]
    fn keeps_caller_supplied_ids() {
        assert_eq!(accepted_request_id(" chat-42 "), Some("chat-42".to_string()));
    }

    #[test]
    fn replaces_unusable_ids() {
        assert!(accepted_request_id("   ").is_none());
        assert!(accepted_request_id("id with spaces").is_none());
        assert!(accepted_request_id(&"a".repeat(65)).is_none());
    }
}
