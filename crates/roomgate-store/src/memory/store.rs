//! In-memory room store using the moka crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use roomgate_core::config::MemoryStoreConfig;
use roomgate_core::result::AppResult;
use roomgate_core::traits::RoomStore;
use roomgate_core::types::{RoomId, RoomRecord};

use crate::keys;

/// Expires a room a fixed time after it was first inserted.
///
/// Updates keep the remaining lifetime, so granting a seat does not
/// extend the room.
#[derive(Debug, Clone, Copy)]
struct RoomExpiry {
    ttl: Duration,
}

impl Expiry<String, RoomRecord> for RoomExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        _value: &RoomRecord,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(self.ttl)
    }
}

/// In-memory room store for single-node deployments and tests.
#[derive(Debug, Clone)]
pub struct MemoryRoomStore {
    /// Room records keyed by `meta:<roomId>`.
    records: Cache<String, RoomRecord>,
    /// Serializes writers so `set_if_unchanged` compares and swaps as one step.
    write_lock: Arc<Mutex<()>>,
}

impl MemoryRoomStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryStoreConfig, room_ttl_seconds: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(RoomExpiry {
                ttl: Duration::from_secs(room_ttl_seconds),
            })
            .build();

        Self {
            records,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn get(&self, room_id: &RoomId) -> AppResult<Option<RoomRecord>> {
        Ok(self.records.get(&keys::room_meta(room_id)).await)
    }

    async fn set(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        let key = keys::room_meta(room_id);
        let _guard = self.write_lock.lock().await;
        self.records.insert(key, record.clone()).await;
        Ok(())
    }

    async fn set_if_unchanged(
        &self,
        room_id: &RoomId,
        expected: &RoomRecord,
        record: &RoomRecord,
    ) -> AppResult<bool> {
        let key = keys::room_meta(room_id);
        let _guard = self.write_lock.lock().await;

        match self.records.get(&key).await {
            Some(current) if current.connected == expected.connected => {
                self.records.insert(key, record.clone()).await;
                Ok(true)
            }
            _ => {
                debug!(key = %key, "Conditional write lost to a concurrent update");
                Ok(false)
            }
        }
    }

    async fn create(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        let key = keys::room_meta(room_id);
        let _guard = self.write_lock.lock().await;
        // Remove first so the new record starts a fresh lifetime.
        self.records.invalidate(&key).await;
        self.records.insert(key, record.clone()).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
