//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
    /// Store backend reachability.
    pub store: String,
}

/// Lobby response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyResponse {
    /// Rejection code the caller was redirected with, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Acknowledgement for an admitted room request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEntryResponse {
    /// Room the caller entered.
    pub room_id: String,
}

/// A newly provisioned room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreatedResponse {
    /// Id of the room.
    pub room_id: String,
    /// Creation time in milliseconds since the epoch.
    pub created_at: i64,
}
