//! Sensor Endpoint Client
//!
//! Thin reqwest wrapper for the two sensor endpoints. The feed layer on
//! top of it owns state; this client only classifies transport failures
//! and validates the response envelope.

use crate::feed::FeedConfig;
use crate::sensor::types::Reading;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// HTTP client for the sensor backend
pub struct SensorClient {
    client: Client,
    config: FeedConfig,
}

/// Envelope wrapping the reading endpoint's response
#[derive(Debug, Deserialize)]
struct ReadingEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Reading>,
}

impl SensorClient {
    /// Create a new client with the given configuration
    pub fn new(config: FeedConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch the latest reading from the backend
    ///
    /// A 2xx response must carry `{"status": "success", "data": {...}}`;
    /// anything else is [`FeedError::InvalidFormat`].
    pub async fn fetch_reading(&self) -> Result<Reading, FeedError> {
        let url = format!("{}/api/sensor-data", self.config.base_url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
            });
        }

        let envelope: ReadingEnvelope = response
            .json()
            .await
            .map_err(|_| FeedError::InvalidFormat)?;

        match envelope {
            ReadingEnvelope {
                status: Some(s),
                data: Some(reading),
            } if s == "success" => Ok(reading),
            _ => Err(FeedError::InvalidFormat),
        }
    }

    /// Fetch the opaque status payload from the backend
    ///
    /// The payload is caller-interpreted; no shape is enforced.
    pub async fn fetch_status(&self) -> Result<serde_json::Value, FeedError> {
        let url = format!("{}/api/sensor-status", self.config.base_url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|_| FeedError::InvalidFormat)
    }
}

fn classify(e: reqwest::Error) -> FeedError {
    if e.is_timeout() {
        FeedError::Timeout
    } else if e.is_connect() {
        FeedError::Unavailable
    } else {
        FeedError::Request(e)
    }
}

/// Errors that can occur when fetching from the sensor backend
///
/// None of these is fatal to the feed; they all collapse into an error
/// connection state and the next poll tick tries again.
#[derive(Error, Debug)]
pub enum FeedError {
    /// No response within the request timeout
    #[error("Request timeout")]
    Timeout,

    /// Connection refused, DNS failure, etc.
    #[error("Sensor backend unavailable")]
    Unavailable,

    /// Non-2xx HTTP status
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// 2xx response whose body is not the expected envelope
    #[error("Invalid response format")]
    InvalidFormat,

    /// Any other transport error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}
