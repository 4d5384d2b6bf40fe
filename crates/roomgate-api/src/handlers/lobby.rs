//! Lobby handler. Rejected room requests land here.

use axum::Json;
use axum::extract::Query;
use serde::Deserialize;

use crate::dto::response::{ApiResponse, LobbyResponse};

/// Query string of a lobby redirect.
#[derive(Debug, Deserialize)]
pub struct LobbyQuery {
    /// Rejection code, e.g. `room_full`.
    pub error: Option<String>,
}

/// GET /
pub async fn lobby(Query(query): Query<LobbyQuery>) -> Json<ApiResponse<LobbyResponse>> {
    Json(ApiResponse::ok(LobbyResponse { error: query.error }))
}
