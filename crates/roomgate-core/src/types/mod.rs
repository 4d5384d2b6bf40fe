//! Shared domain types.

pub mod id;
pub mod room;

pub use id::{RoomId, SeatToken};
pub use room::{RoomRecord, SEAT_CAPACITY};
