//! Request logging middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Log one line per request with its outcome and latency.
///
/// Server errors log at error level, rejected registrations at warn.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(%method, %path, %status, latency_ms, "Registration request errored");
    } else if status.is_client_error() {
        warn!(%method, %path, %status, latency_ms, "Registration request rejected");
    } else {
        debug!(%method, %path, %status, latency_ms, "Registration request handled");
    }

    response
}
