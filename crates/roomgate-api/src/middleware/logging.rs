//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use super::admission::GateOutcome;

/// Logs one line per request. Gated room requests also carry the gate's
/// outcome, so rejections can be told apart from handler statuses.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let gate = response
        .extensions()
        .get::<GateOutcome>()
        .map_or("bypass", |outcome| outcome.0);

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        gate,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request served"
    );

    response
}
