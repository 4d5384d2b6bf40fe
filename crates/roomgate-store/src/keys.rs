//! Store key builders.

use roomgate_core::types::RoomId;

/// Hash field holding the JSON array of seat tokens.
pub const FIELD_CONNECTED: &str = "connected";

/// Hash field holding the creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Key of the membership record for a room.
pub fn room_meta(room_id: &RoomId) -> String {
    format!("meta:{room_id}")
}
