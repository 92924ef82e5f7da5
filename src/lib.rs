//! # XStep
//!
//! Backend and client library for a wearable insole pressure sensor.
//!
//! The device firmware pushes raw pressure samples over HTTP; the backend
//! keeps the single most recent sample in memory and serves it enriched
//! with derived fields (percentage of full scale, press flag, freshness).
//! The feed client polls that endpoint on a fixed interval and tracks
//! connection state for consumers such as the mobile dashboard.
//!
//! ## Modules
//!
//! - [`sensor`]: Latest-sample store, reading type, and simulator
//! - [`feed`]: Polling client with connection-state tracking
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with env overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xstep::feed::{FeedConfig, SensorFeed};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let feed = Arc::new(SensorFeed::new(FeedConfig::default()));
//!     Arc::clone(&feed).start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!
//!     if feed.foot_press_active().await {
//!         println!("Foot press detected");
//!     }
//!
//!     feed.stop();
//! }
//! ```

pub mod api;
pub mod config;
pub mod feed;
pub mod sensor;

// Re-export top-level types for convenience
pub use sensor::{Reading, SensorSimulator, SensorStatus, SensorStore, StatusTier};

pub use feed::{
    ConnectionState, ConnectionStatus, FeedConfig, FeedError, FeedEvent, FeedState, SensorClient,
    SensorFeed,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, SensorConfig, ServerConfig, SimulatorConfig};
