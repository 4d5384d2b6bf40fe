//! Route definitions for the RoomGate HTTP service.

use axum::http::StatusCode;
use axum::{
    Router, middleware as axum_middleware,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// The admission middleware wraps the fallback as well, so malformed
/// `/room/...` paths that match no route still reach the gate and are sent
/// to the lobby. The room route accepts every method so that a forwarded
/// request always lands on a handler after its seat was written.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::lobby::lobby))
        .route("/room/{room_id}", any(handlers::room::enter))
        .route("/api/rooms", post(handlers::room::create))
        .route("/api/health", get(handlers::health::health))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admission::admission_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}
