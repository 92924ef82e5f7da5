//! Feed State
//!
//! The feed's view of the sensor: the last reading it received and its
//! belief about whether it is currently receiving valid data.

use crate::sensor::types::Reading;
use chrono::{DateTime, Utc};

/// Transport status of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
}

/// Connection status plus a human-readable message
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub message: String,
    /// When the status last changed
    pub last_update: Option<DateTime<Utc>>,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            message: "Not connected".to_string(),
            last_update: None,
        }
    }
}

impl ConnectionState {
    pub(crate) fn connected() -> Self {
        Self {
            status: ConnectionStatus::Connected,
            message: "Receiving sensor data".to_string(),
            last_update: Some(Utc::now()),
        }
    }

    pub(crate) fn error(message: impl std::fmt::Display) -> Self {
        Self {
            status: ConnectionStatus::Error,
            message: format!("Connection error: {}", message),
            last_update: Some(Utc::now()),
        }
    }
}

/// Everything the feed tracks, snapshot-able by consumers
///
/// The reading is replaced wholesale on every successful fetch and
/// retained across failed ones, so a transient failure leaves the
/// last-known reading visible while the status flips.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub reading: Reading,
    pub connection: ConnectionState,
    pub error: Option<String>,
}

impl FeedState {
    /// True when the last fetch cycle succeeded
    pub fn is_connected(&self) -> bool {
        self.connection.status == ConnectionStatus::Connected
    }

    /// True when the backend considers the reading still valid
    pub fn has_recent_data(&self) -> bool {
        self.reading.is_recent
    }

    /// True when a press is detected on a reading that is still recent
    ///
    /// A stale "pressed" reading must not be shown as active.
    pub fn foot_press_active(&self) -> bool {
        self.reading.foot_press_detected && self.has_recent_data()
    }
}
