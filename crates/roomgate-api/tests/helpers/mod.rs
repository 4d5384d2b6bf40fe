//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use roomgate_api::{AppState, build_router};
use roomgate_core::config::{AppConfig, MemoryStoreConfig};
use roomgate_core::traits::RoomStore;
use roomgate_core::types::{RoomId, RoomRecord, SeatToken};
use roomgate_store::memory::MemoryRoomStore;

/// Creation timestamp used for seeded rooms.
pub const CREATED_AT: i64 = 1_766_765_519_639;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the gate, for seeding and assertions
    pub store: Arc<dyn RoomStore>,
}

/// Response captured from the router
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `Location` header of a redirect.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The single `Set-Cookie` header, if any.
    pub fn set_cookie(&self) -> Option<&str> {
        let mut values = self.headers.get_all(header::SET_COOKIE).iter();
        let first = values.next().and_then(|v| v.to_str().ok());
        assert!(values.next().is_none(), "expected at most one Set-Cookie");
        first
    }

    /// Token value carried by the `Set-Cookie` header.
    pub fn seat_token(&self) -> Option<String> {
        let cookie = self.set_cookie()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix("x-auth-token=").map(str::to_string)
    }
}

impl TestApp {
    /// Create a test application over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store: Arc<dyn RoomStore> = Arc::new(MemoryRoomStore::new(
            &MemoryStoreConfig { max_capacity: 100 },
            600,
        ));
        Self::with_store(config, store)
    }

    /// Create a test application over the given store
    pub fn with_store(config: AppConfig, store: Arc<dyn RoomStore>) -> Self {
        let state = AppState::new(config, Arc::clone(&store));
        Self {
            router: build_router(state),
            store,
        }
    }

    /// Seed a room record holding the given tokens
    pub async fn seed_room(&self, room_id: &str, tokens: &[&str]) {
        let record = tokens.iter().fold(RoomRecord::new(CREATED_AT), |room, t| {
            room.with_seat(SeatToken::from_raw(*t))
        });
        self.store
            .create(&RoomId::parse(room_id).unwrap(), &record)
            .await
            .unwrap();
    }

    /// Load a room record
    pub async fn room(&self, room_id: &str) -> Option<RoomRecord> {
        self.store
            .get(&RoomId::parse(room_id).unwrap())
            .await
            .unwrap()
    }

    /// Tokens currently seated in a room
    pub async fn seats(&self, room_id: &str) -> Vec<String> {
        self.room(room_id)
            .await
            .map(|r| r.connected.into_iter().map(SeatToken::into_inner).collect())
            .unwrap_or_default()
    }

    /// Make a request, optionally presenting a seat cookie
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("theme=dark; x-auth-token={token}"));
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
