//! Redis room store implementation.
//!
//! Each room is a hash with two fields: `connected` (a JSON array of seat
//! tokens) and `createdAt` (milliseconds since the epoch).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, warn};

use roomgate_core::config::StoreConfig;
use roomgate_core::error::{AppError, ErrorKind};
use roomgate_core::result::AppResult;
use roomgate_core::traits::RoomStore;
use roomgate_core::types::{RoomId, RoomRecord, SeatToken};

use super::connection;
use crate::keys::{self, FIELD_CONNECTED, FIELD_CREATED_AT};

/// Lua script for an atomic compare-and-set of a room record.
///
/// KEYS[1] = room hash
/// ARGV[1] = expected `connected` JSON
/// ARGV[2] = new `connected` JSON
/// ARGV[3] = `createdAt`
///
/// Returns:
///   1 = written
///   0 = stored `connected` differs, or the room is gone
const COMPARE_AND_SET_SCRIPT: &str = r#"
    local current = redis.call('HGET', KEYS[1], 'connected')
    if not current or current ~= ARGV[1] then
        return 0
    end
    redis.call('HSET', KEYS[1], 'connected', ARGV[2], 'createdAt', ARGV[3])
    return 1
"#;

/// Redis-backed room store for multi-node deployments.
#[derive(Clone)]
pub struct RedisRoomStore {
    conn: ConnectionManager,
    /// Prepended to every room key; empty keeps `meta:<roomId>`.
    key_prefix: String,
    /// Lifetime applied when a room is provisioned.
    room_ttl: Duration,
}

impl std::fmt::Debug for RedisRoomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRoomStore")
            .field("key_prefix", &self.key_prefix)
            .field("room_ttl", &self.room_ttl)
            .finish_non_exhaustive()
    }
}

impl RedisRoomStore {
    /// Connect to the configured Redis server.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let conn = connection::open(&config.redis.url).await?;
        Ok(Self {
            conn,
            key_prefix: config.redis.key_prefix.clone(),
            room_ttl: Duration::from_secs(config.room_ttl_seconds),
        })
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::StoreUnavailable, format!("Redis error: {e}"), e)
    }

    fn key(&self, room_id: &RoomId) -> String {
        format!("{}{}", self.key_prefix, keys::room_meta(room_id))
    }
}

/// Encode the `connected` field.
pub fn encode_connected(record: &RoomRecord) -> AppResult<String> {
    Ok(serde_json::to_string(&record.connected)?)
}

/// Decode an `HGETALL` reply. An empty reply means the room does not exist.
pub fn decode_record(fields: HashMap<String, String>) -> AppResult<Option<RoomRecord>> {
    if fields.is_empty() {
        return Ok(None);
    }

    let connected = fields
        .get(FIELD_CONNECTED)
        .ok_or_else(|| AppError::serialization("Room record is missing 'connected'"))?;
    let created_at = fields
        .get(FIELD_CREATED_AT)
        .ok_or_else(|| AppError::serialization("Room record is missing 'createdAt'"))?;

    let connected: Vec<SeatToken> = serde_json::from_str(connected)?;
    let created_at: i64 = created_at.trim().parse().map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Invalid 'createdAt' value", e)
    })?;

    Ok(Some(RoomRecord {
        connected,
        created_at,
    }))
}

#[async_trait]
impl RoomStore for RedisRoomStore {
    async fn get(&self, room_id: &RoomId) -> AppResult<Option<RoomRecord>> {
        let key = self.key(room_id);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        decode_record(fields).inspect_err(|e| {
            warn!(key = %key, error = %e, "Stored room record is malformed");
        })
    }

    /// Overwrites both fields. The key's expiry is left as is, so a room
    /// that expired since the read comes back without a TTL.
    async fn set(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        let key = self.key(room_id);
        let connected = encode_connected(record)?;
        let mut conn = self.conn.clone();

        let _: () = redis::cmd("HSET")
            .arg(&key)
            .arg(FIELD_CONNECTED)
            .arg(connected)
            .arg(FIELD_CREATED_AT)
            .arg(record.created_at)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(key = %key, seats = record.connected.len(), "Room record written");
        Ok(())
    }

    async fn set_if_unchanged(
        &self,
        room_id: &RoomId,
        expected: &RoomRecord,
        record: &RoomRecord,
    ) -> AppResult<bool> {
        let key = self.key(room_id);
        let mut conn = self.conn.clone();

        let result: i64 = redis::Script::new(COMPARE_AND_SET_SCRIPT)
            .key(&key)
            .arg(encode_connected(expected)?)
            .arg(encode_connected(record)?)
            .arg(record.created_at)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        match result {
            1 => Ok(true),
            0 => {
                debug!(key = %key, "Conditional write lost to a concurrent update");
                Ok(false)
            }
            other => Err(AppError::internal(format!(
                "Unexpected compare-and-set result: {other}"
            ))),
        }
    }

    async fn create(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        let key = self.key(room_id);
        let connected = encode_connected(record)?;
        let mut conn = self.conn.clone();

        let _: () = redis::pipe()
            .atomic()
            .cmd("DEL")
            .arg(&key)
            .ignore()
            .cmd("HSET")
            .arg(&key)
            .arg(FIELD_CONNECTED)
            .arg(connected)
            .arg(FIELD_CREATED_AT)
            .arg(record.created_at)
            .ignore()
            .cmd("EXPIRE")
            .arg(&key)
            .arg(self.room_ttl.as_secs())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(key = %key, ttl_seconds = self.room_ttl.as_secs(), "Room provisioned");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
