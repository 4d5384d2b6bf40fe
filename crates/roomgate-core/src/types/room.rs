//! The per-room membership record.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::id::SeatToken;

/// Number of seats in every room.
pub const SEAT_CAPACITY: usize = 2;

/// Membership record stored under `meta:<roomId>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    /// Admitted seat tokens, in admission order.
    pub connected: Vec<SeatToken>,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl RoomRecord {
    /// A freshly provisioned, empty room.
    pub fn new(created_at: i64) -> Self {
        Self {
            connected: Vec::new(),
            created_at,
        }
    }

    /// A freshly provisioned room stamped with the current time.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    /// Whether `token` holds a seat. Exact string comparison.
    pub fn is_seated(&self, token: &str) -> bool {
        self.connected.iter().any(|t| t.as_str() == token)
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.connected.len() >= SEAT_CAPACITY
    }

    /// Copy of this record with `token` appended; `created_at` is preserved.
    pub fn with_seat(&self, token: SeatToken) -> Self {
        let mut connected = self.connected.clone();
        connected.push(token);
        Self {
            connected,
            created_at: self.created_at,
        }
    }
}
