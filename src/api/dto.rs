//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::sensor::types::Reading;
use serde::{Deserialize, Serialize};

// ============================================
// SENSOR DTOs
// ============================================

/// Raw sample pushed by the device firmware
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Raw pressure magnitude; must be a non-negative number
    pub pressure: f64,
}

/// Response to a sample push
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Status: "success"
    pub status: String,
    /// Human-readable confirmation
    pub message: String,
    /// The stored sample as the read endpoint would serve it
    pub data: Reading,
}

/// Envelope served by `GET /api/sensor-data`
///
/// The feed client requires exactly this shape: `status` must be
/// "success" and `data` must be present.
#[derive(Debug, Serialize, Deserialize)]
pub struct SensorDataResponse {
    pub status: String,
    pub data: Reading,
}

impl SensorDataResponse {
    pub fn success(data: Reading) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
