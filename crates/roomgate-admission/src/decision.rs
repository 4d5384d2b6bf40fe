//! Admission outcomes.

use std::fmt;

use roomgate_core::types::{RoomRecord, SeatToken};

/// Why a room request was turned back to the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// No record exists for the room.
    RoomNotFound,
    /// Both seats are taken by other tokens.
    RoomFull,
}

impl RejectReason {
    /// Code carried in the lobby redirect's `error` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Self::RoomNotFound => "room_not_found",
            Self::RoomFull => "room_full",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The gate's decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Let the request through, attaching a new seat token if one was granted.
    Forward {
        /// Freshly minted token to deliver as the caller's cookie.
        set_cookie: Option<SeatToken>,
    },
    /// Send the caller to the lobby. No reason means the path was not a room.
    Redirect {
        /// Rejection reason, if the request did name a room.
        reason: Option<RejectReason>,
    },
}

impl Admission {
    /// Short label for logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Forward { set_cookie: None } => "reentry",
            Self::Forward { set_cookie: Some(_) } => "seat_granted",
            Self::Redirect { reason: None } => "not_a_room",
            Self::Redirect {
                reason: Some(RejectReason::RoomNotFound),
            } => "room_not_found",
            Self::Redirect {
                reason: Some(RejectReason::RoomFull),
            } => "room_full",
        }
    }
}

/// Classification of a caller against a loaded room record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The room has no record.
    NotFound,
    /// The caller's token already holds a seat.
    Seated,
    /// No seat is left for the caller.
    Full,
    /// A seat may be granted.
    Available,
}

/// Classify a caller. Checks run in order: existence, existing seat, capacity.
///
/// A stale or missing token never takes priority over capacity.
pub fn classify(record: Option<&RoomRecord>, presented: Option<&str>) -> Verdict {
    let Some(record) = record else {
        return Verdict::NotFound;
    };

    if presented.is_some_and(|token| record.is_seated(token)) {
        return Verdict::Seated;
    }

    if record.is_full() {
        return Verdict::Full;
    }

    Verdict::Available
}
