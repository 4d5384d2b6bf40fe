//! Admission gate configuration.

use serde::{Deserialize, Serialize};

/// How the gate persists a granted seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Plain read-modify-write. Concurrent grants may overwrite each other.
    #[default]
    Overwrite,
    /// Write only if `connected` is unchanged since the read; re-run on conflict.
    CompareAndSet,
}

/// Admission gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Cookie carrying the seat token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Lobby location that rejected requests are redirected to.
    #[serde(default = "default_lobby_path")]
    pub lobby_path: String,
    /// Force the `Secure` cookie attribute on or off. Unset follows the environment.
    #[serde(default)]
    pub secure_cookie: Option<bool>,
    /// Seat grant write strategy.
    #[serde(default)]
    pub write_mode: WriteMode,
    /// Attempts before a compare-and-set grant gives up.
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            lobby_path: default_lobby_path(),
            secure_cookie: None,
            write_mode: WriteMode::default(),
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

fn default_cookie_name() -> String {
    "x-auth-token".to_string()
}

fn default_lobby_path() -> String {
    "/".to_string()
}

fn default_max_write_attempts() -> u32 {
    3
}
