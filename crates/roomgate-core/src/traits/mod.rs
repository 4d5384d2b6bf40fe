//! Trait seams between the admission gate and its collaborators.

pub mod room_store;

pub use room_store::RoomStore;
