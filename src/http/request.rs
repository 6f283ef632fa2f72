//! Request-scoped middleware.
//!
//! # Responsibilities
//! - Assign a request ID (UUID v4) unless the client supplied one
//! - Echo the request ID on the response
//! - Open the per-request trace span, tagged with the request ID
//! - Record per-route request metrics
//!
//! # Design Decisions
//! - Request ID added as early as possible so the trace span carries it

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderName,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::observability::metrics;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates an `x-request-id` for requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Span for `TraceLayer`; runs inside `SetRequestIdLayer`, so the ID is present.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Route-layer middleware recording request count and latency.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), &route, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use tower::ServiceExt;

    use crate::config::ShellConfig;
    use crate::engine;
    use crate::http::HttpServer;
    use crate::observability::logging::capture::capture_logs;

    fn router() -> axum::Router {
        let mut config = ShellConfig::default();
        config.startup.enabled = false;
        let engine = Arc::new(engine::from_config(&config.engine));
        HttpServer::new(config, engine).router()
    }

    #[tokio::test]
    async fn test_trace_span_carries_client_request_id() {
        let (_guard, logs) = capture_logs();

        let request = axum::http::Request::builder()
            .uri("/api/init-db")
            .header("x-request-id", "req-7f3a")
            .body(Body::empty())
            .unwrap();
        router().oneshot(request).await.unwrap();

        assert!(
            logs.contents().contains("request_id=req-7f3a"),
            "span fields missing from: {}",
            logs.contents()
        );
    }

    #[tokio::test]
    async fn test_trace_span_carries_generated_request_id() {
        let (_guard, logs) = capture_logs();

        let request = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let generated = response.headers()["x-request-id"].to_str().unwrap().to_owned();

        assert!(logs.contents().contains(&format!("request_id={generated}")));
    }
}
