//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use roomgate_core::config::StoreConfig;
use roomgate_core::error::AppError;
use roomgate_core::result::AppResult;
use roomgate_core::traits::RoomStore;
use roomgate_core::types::{RoomId, RoomRecord};

/// Store manager that wraps the configured room store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn RoomStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn RoomStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis room store");
                Arc::new(crate::redis::RedisRoomStore::connect(config).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory room store");
                Arc::new(crate::memory::MemoryRoomStore::new(
                    &config.memory,
                    config.room_ttl_seconds,
                ))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn RoomStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl RoomStore for StoreManager {
    async fn get(&self, room_id: &RoomId) -> AppResult<Option<RoomRecord>> {
        self.inner.get(room_id).await
    }

    async fn set(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        self.inner.set(room_id, record).await
    }

    async fn set_if_unchanged(
        &self,
        room_id: &RoomId,
        expected: &RoomRecord,
        record: &RoomRecord,
    ) -> AppResult<bool> {
        self.inner.set_if_unchanged(room_id, expected, record).await
    }

    async fn create(&self, room_id: &RoomId, record: &RoomRecord) -> AppResult<()> {
        self.inner.create(room_id, record).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
