//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use roomgate_admission::AdmissionGate;
use roomgate_core::config::AppConfig;
use roomgate_core::traits::RoomStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Room membership store
    pub store: Arc<dyn RoomStore>,
    /// Admission gate over `store`
    pub gate: Arc<AdmissionGate>,
    /// Process start time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires the gate to the given store using the admission settings.
    pub fn new(config: AppConfig, store: Arc<dyn RoomStore>) -> Self {
        let gate = AdmissionGate::from_config(Arc::clone(&store), &config.admission);
        Self {
            config: Arc::new(config),
            store,
            gate: Arc::new(gate),
            started_at: Instant::now(),
        }
    }
}
