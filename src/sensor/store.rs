//! Sensor Store
//!
//! In-memory store holding the single most recent pressure sample.
//! The firmware overwrites it on every POST; readers derive percentage,
//! press flag, and freshness from the raw value and its receive time.

use crate::config::SensorConfig;
use crate::sensor::types::Reading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// The raw sample as received from the device
#[derive(Debug, Clone, Copy)]
struct Sample {
    pressure: u32,
    received_at: DateTime<Utc>,
}

/// Holds the latest sensor sample behind an async lock
pub struct SensorStore {
    latest: RwLock<Option<Sample>>,
    config: SensorConfig,
}

/// Tiered sensor liveness derived from sample age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    /// Sample younger than the recency window
    Active,
    /// Sample older than the recency window but not yet stale
    Inactive,
    /// Sample older than the stale window
    Disconnected,
    /// No sample received since startup
    NoData,
}

/// Liveness payload served by `GET /api/sensor-status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorStatus {
    pub status: StatusTier,
    pub message: String,
    pub last_reading: Option<DateTime<Utc>>,
    pub seconds_since_last_reading: Option<i64>,
}

impl SensorStore {
    /// Create an empty store with the given interpretation settings
    pub fn new(config: SensorConfig) -> Self {
        Self {
            latest: RwLock::new(None),
            config,
        }
    }

    /// Record a new raw sample, replacing the previous one
    pub async fn record(&self, pressure: u32) -> Reading {
        self.record_at(pressure, Utc::now()).await
    }

    /// Record a sample with an explicit receive time
    pub(crate) async fn record_at(&self, pressure: u32, received_at: DateTime<Utc>) -> Reading {
        let sample = Sample {
            pressure,
            received_at,
        };
        *self.latest.write().await = Some(sample);

        tracing::debug!(pressure, "Sensor sample recorded");
        self.enrich(Some(sample), received_at)
    }

    /// Get the latest reading with derived fields computed as of now
    pub async fn reading(&self) -> Reading {
        self.reading_at(Utc::now()).await
    }

    pub(crate) async fn reading_at(&self, now: DateTime<Utc>) -> Reading {
        let sample = *self.latest.read().await;
        self.enrich(sample, now)
    }

    /// Get the tiered liveness status as of now
    pub async fn status(&self) -> SensorStatus {
        self.status_at(Utc::now()).await
    }

    pub(crate) async fn status_at(&self, now: DateTime<Utc>) -> SensorStatus {
        let sample = *self.latest.read().await;

        let Some(sample) = sample else {
            return SensorStatus {
                status: StatusTier::NoData,
                message: "No sensor data received yet".to_string(),
                last_reading: None,
                seconds_since_last_reading: None,
            };
        };

        let age = (now - sample.received_at).num_seconds();
        let (status, message) = if age < self.config.recent_window_secs {
            (StatusTier::Active, "Sensor is actively sending data")
        } else if age < self.config.stale_window_secs {
            (StatusTier::Inactive, "Sensor data is stale")
        } else {
            (StatusTier::Disconnected, "Sensor appears to be disconnected")
        };

        SensorStatus {
            status,
            message: message.to_string(),
            last_reading: Some(sample.received_at),
            seconds_since_last_reading: Some(age),
        }
    }

    /// Derive the full reading from a raw sample
    fn enrich(&self, sample: Option<Sample>, now: DateTime<Utc>) -> Reading {
        let Some(sample) = sample else {
            return Reading::default();
        };

        let age = (now - sample.received_at).num_seconds();
        let percentage =
            (sample.pressure as f64 / self.config.adc_max as f64 * 100.0).min(100.0);

        Reading {
            pressure: sample.pressure,
            pressure_percentage: percentage,
            foot_press_detected: sample.pressure > self.config.press_threshold,
            timestamp: Some(sample.received_at),
            seconds_since_last_reading: Some(age),
            is_recent: age < self.config.recent_window_secs,
        }
    }
}
