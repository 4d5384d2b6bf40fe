//! HTTP handlers.

pub mod health;
pub mod lobby;
pub mod room;
