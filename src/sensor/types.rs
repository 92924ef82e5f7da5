//! Sensor Types
//!
//! Wire-level reading type shared by the backend API and the feed client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One enriched sensor sample
///
/// This is the shape served by `GET /api/sensor-data` and consumed by the
/// polling feed. The raw `pressure` magnitude is opaque to clients; the
/// derived fields are computed server-side when the sample is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Raw sensor magnitude (12-bit ADC on the reference hardware)
    pub pressure: u32,
    /// Pressure as a percentage of full scale, clamped to 100
    pub pressure_percentage: f64,
    /// True when the raw pressure crossed the press threshold
    pub foot_press_detected: bool,
    /// When the sample was received; None before the first sample
    pub timestamp: Option<DateTime<Utc>>,
    /// Age of the sample in whole seconds; None before the first sample
    pub seconds_since_last_reading: Option<i64>,
    /// True when the sample is younger than the recency window
    pub is_recent: bool,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            pressure: 0,
            pressure_percentage: 0.0,
            foot_press_detected: false,
            timestamp: None,
            seconds_since_last_reading: None,
            is_recent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reading_is_empty() {
        let reading = Reading::default();
        assert_eq!(reading.pressure, 0);
        assert!(reading.timestamp.is_none());
        assert!(!reading.is_recent);
        assert!(!reading.foot_press_detected);
    }

    #[test]
    fn test_wire_field_names() {
        let reading = Reading {
            pressure: 620,
            pressure_percentage: 62.0,
            foot_press_detected: true,
            timestamp: Some(Utc::now()),
            seconds_since_last_reading: Some(1),
            is_recent: true,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["pressure"], 620);
        assert_eq!(json["foot_press_detected"], true);
        assert_eq!(json["seconds_since_last_reading"], 1);
        assert_eq!(json["is_recent"], true);
    }
}
