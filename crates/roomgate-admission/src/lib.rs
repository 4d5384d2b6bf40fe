//! # roomgate-admission
//!
//! Decides whether a request for a room may enter.
//!
//! ## Modules
//!
//! - `path`: room route matching and room id extraction
//! - `decision`: the `Admission` result value and the pure classification step
//! - `gate`: the admission algorithm over an injected `RoomStore`

pub mod decision;
pub mod gate;
pub mod path;

pub use decision::{Admission, RejectReason, Verdict, classify};
pub use gate::AdmissionGate;
pub use path::{is_gated_path, room_id_from_path};
