//! Axum middleware stack.

pub mod admission;
pub mod logging;
