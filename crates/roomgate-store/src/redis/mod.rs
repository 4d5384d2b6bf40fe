//! Redis room store.

pub mod connection;
pub mod operations;

pub use operations::RedisRoomStore;
