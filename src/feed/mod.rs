//! Sensor Feed
//!
//! Best-effort near-real-time view of the sensor backend via fixed-interval
//! polling. The feed fetches immediately on start, then on every tick until
//! stopped. Ticks are serialized: a tick waits for the previous fetch to
//! resolve, so at most one reading request is outstanding at a time.
//!
//! All failures (timeout, refused connection, HTTP error, malformed body)
//! collapse into an error connection state for consumers to render; the
//! next tick attempts recovery on its own. The previous reading is retained
//! across failures.

pub mod client;
pub mod state;

pub use client::{FeedError, SensorClient};
pub use state::{ConnectionState, ConnectionStatus, FeedState};

use crate::sensor::types::Reading;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

/// Configuration for the sensor feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the sensor backend (e.g., "http://localhost:5002")
    pub base_url: String,
    /// Poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            poll_interval_ms: 500,
            request_timeout_ms: 5000,
        }
    }
}

/// Lifecycle and fetch events emitted to the observer hook
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Started,
    Stopped,
    ReadingReceived { pressure: u32 },
    FetchFailed { message: String },
}

type Observer = Arc<dyn Fn(FeedEvent) + Send + Sync>;

/// Polls the sensor backend and tracks connection state
pub struct SensorFeed {
    client: SensorClient,
    state: Arc<RwLock<FeedState>>,
    running: Arc<AtomicBool>,
    observer: Option<Observer>,
}

impl SensorFeed {
    /// Create a feed for the given backend
    pub fn new(config: FeedConfig) -> Self {
        Self {
            client: SensorClient::new(config),
            state: Arc::new(RwLock::new(FeedState::default())),
            running: Arc::new(AtomicBool::new(false)),
            observer: None,
        }
    }

    /// Attach an observer called on lifecycle and fetch events
    pub fn with_observer(mut self, observer: impl Fn(FeedEvent) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Get the feed configuration
    pub fn config(&self) -> &FeedConfig {
        self.client.config()
    }

    /// Start polling
    ///
    /// Idempotent: a second call while running is a no-op. Fetches
    /// immediately, then repeats on the configured interval until
    /// [`stop`](Self::stop) is called.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(
            base_url = %self.config().base_url,
            interval_ms = self.config().poll_interval_ms,
            "Starting sensor polling"
        );
        self.emit(FeedEvent::Started);

        let feed = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_millis(
                feed.config().poll_interval_ms,
            ));
            // Skip ticks missed while a slow fetch was outstanding
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // First tick completes immediately
                ticker.tick().await;

                if !feed.running.load(Ordering::SeqCst) {
                    break;
                }

                feed.fetch_once().await;
            }
        });
    }

    /// Stop polling
    ///
    /// Halts scheduling of new ticks. An in-flight request is not
    /// cancelled; it resolves on its own (or hits its timeout) and may
    /// still write state.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        tracing::info!("Stopped sensor polling");
        self.emit(FeedEvent::Stopped);
    }

    /// Whether the polling loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Perform one fetch cycle against the reading endpoint
    ///
    /// On success the stored reading is replaced wholesale and the
    /// connection state becomes connected; on failure the error is
    /// recorded and the previous reading is retained.
    pub async fn fetch_once(&self) -> Option<Reading> {
        match self.client.fetch_reading().await {
            Ok(reading) => {
                let mut state = self.state.write().await;
                state.reading = reading.clone();
                state.connection = ConnectionState::connected();
                state.error = None;
                drop(state);

                tracing::debug!(pressure = reading.pressure, "Sensor reading received");
                self.emit(FeedEvent::ReadingReceived {
                    pressure: reading.pressure,
                });
                Some(reading)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Sensor fetch failed");

                let mut state = self.state.write().await;
                state.connection = ConnectionState::error(&message);
                state.error = Some(message.clone());
                drop(state);

                self.emit(FeedEvent::FetchFailed { message });
                None
            }
        }
    }

    /// Query the status endpoint
    ///
    /// Independent of the polling cycle: the result goes to the caller and
    /// failures never mutate feed state.
    pub async fn check_status(&self) -> Option<serde_json::Value> {
        match self.client.fetch_status().await {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Sensor status check failed");
                None
            }
        }
    }

    /// Snapshot the current feed state
    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// True when the last fetch cycle succeeded
    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_connected()
    }

    /// True when the backend considers the reading still valid
    pub async fn has_recent_data(&self) -> bool {
        self.state.read().await.has_recent_data()
    }

    /// True when a press is detected on a still-recent reading
    pub async fn foot_press_active(&self) -> bool {
        self.state.read().await.foot_press_active()
    }

    /// The last fetch error, if the most recent cycle failed
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    fn emit(&self, event: FeedEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}
