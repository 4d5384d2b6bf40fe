//! # roomgate-core
//!
//! Core crate for RoomGate. Contains the room store contract, configuration
//! schemas, typed identifiers, the room record model, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other RoomGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
