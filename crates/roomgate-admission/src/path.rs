//! Room route matching.

use roomgate_core::types::RoomId;

/// Route prefix handled by the gate.
const ROOM_PREFIX: &str = "/room";

/// Whether the gate is responsible for `path`.
///
/// Matches `/room` and everything below `/room/`, including paths that the
/// gate will then reject as malformed.
pub fn is_gated_path(path: &str) -> bool {
    match path.strip_prefix(ROOM_PREFIX) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Extract the room id from a path of the exact shape `/room/<roomId>`.
///
/// Returns `None` for `/room`, `/room/`, nested paths and trailing slashes.
pub fn room_id_from_path(path: &str) -> Option<RoomId> {
    let segment = path.strip_prefix(ROOM_PREFIX)?.strip_prefix('/')?;
    RoomId::parse(segment)
}
