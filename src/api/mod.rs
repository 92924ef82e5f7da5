//! XStep REST API
//!
//! HTTP API layer for the sensor backend, built with Axum.
//!
//! # Endpoints
//!
//! ## Sensor
//! - `POST /api/sensor-data` - Receive a raw sample from the device
//! - `GET /api/sensor-data` - Latest enriched reading
//! - `GET /api/sensor-status` - Tiered sensor liveness
//!
//! ## Health
//! - `GET /health` - Liveness and uptime
//!
//! # Example
//!
//! ```rust,ignore
//! use xstep::api::{build_router, serve, AppState};
//! use xstep::config::{SensorConfig, ServerConfig};
//! use xstep::sensor::SensorStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SensorStore::new(SensorConfig::default()));
//!     let state = AppState::new(store);
//!     serve(state, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ServerConfig;
use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/sensor-data",
            get(routes::sensor::latest_reading).post(routes::sensor::ingest_sample),
        )
        .route("/sensor-status", get(routes::sensor::sensor_status));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("XStep API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("XStep API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
