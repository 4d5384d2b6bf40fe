//! Membership store trait for pluggable backends.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{RoomId, RoomRecord};

/// Key-value store holding one [`RoomRecord`] per room.
///
/// Backend I/O failures are reported as `ErrorKind::StoreUnavailable`.
/// `get` returning `Ok(None)` means the room was never provisioned or has
/// expired; it is never used to signal a failed read.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the record for a room.
    async fn get(&self, room_id: &RoomId) -> AppResult<Option<RoomRecord>>;

    /// Replace the whole record. Not atomic with a preceding `get`.
    async fn set(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()>;

    /// Replace the record only if its stored `connected` still equals
    /// `expected.connected`.
    ///
    /// Returns `false` when another writer got there first or the record
    /// has disappeared.
    async fn set_if_unchanged(
        &self,
        room_id: &RoomId,
        expected: &RoomRecord,
        record: &RoomRecord,
    ) -> AppResult<bool>;

    /// Provision a new room record with the backend's room lifetime.
    async fn create(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
