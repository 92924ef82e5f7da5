//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::sensor::store::SensorStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Latest-sample store shared with the simulator
    pub store: Arc<SensorStore>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState around a sensor store
    pub fn new(store: Arc<SensorStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
