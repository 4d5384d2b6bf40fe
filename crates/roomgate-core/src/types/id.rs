//! Typed identifiers for rooms and seat tokens.
//!
//! Both are short random strings over the URL-safe alphabet. Wrapping them
//! in newtypes keeps a room id from being passed where a token is expected.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// URL-safe alphabet used for generated identifiers.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Length of generated identifiers.
pub const ID_LENGTH: usize = 21;

/// Generates a random identifier of `len` characters.
///
/// The alphabet has 64 symbols, so masking a random byte with `63` picks
/// each symbol with equal probability.
pub fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let byte: u8 = rng.r#gen();
            ALPHABET[(byte & 63) as usize] as char
        })
        .collect()
}

/// Identifier of a room, taken from a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an existing id. Returns `None` for an empty or nested segment.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.contains('/') {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    /// Generates a fresh random room id.
    pub fn generate() -> Self {
        Self(random_id(ID_LENGTH))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque seat ticket proving prior admission to one room.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatToken(String);

impl SeatToken {
    /// Mints a new unguessable token.
    pub fn mint() -> Self {
        Self(random_id(ID_LENGTH))
    }

    /// Wraps a token received from a client or the store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for SeatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeatToken(****)")
    }
}
