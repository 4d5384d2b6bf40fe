//! # roomgate-api
//!
//! HTTP layer for RoomGate built on Axum.
//!
//! The admission gate runs as middleware in front of every `/room` path and
//! turns its decision into either a pass-through (with a seat cookie) or a
//! lobby redirect.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
