//! Room handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use roomgate_core::types::{RoomId, RoomRecord};

use crate::dto::response::{ApiResponse, RoomCreatedResponse, RoomEntryResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// ANY /room/{room_id}
///
/// Only reached once the admission middleware forwarded the request.
pub async fn enter(Path(room_id): Path<String>) -> Json<ApiResponse<RoomEntryResponse>> {
    Json(ApiResponse::ok(RoomEntryResponse { room_id }))
}

/// POST /api/rooms
///
/// Provisions an empty room with a fresh id.
pub async fn create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<RoomCreatedResponse>>), ApiError> {
    let room_id = RoomId::generate();
    let record = RoomRecord::now();

    state.store.create(&room_id, &record).await?;
    info!(room_id = %room_id, "Room created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(RoomCreatedResponse {
            room_id: room_id.to_string(),
            created_at: record.created_at,
        })),
    ))
}
