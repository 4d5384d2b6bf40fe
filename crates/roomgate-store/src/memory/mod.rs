//! In-memory room store.

pub mod store;

pub use store::MemoryRoomStore;
