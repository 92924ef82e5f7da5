//! Sensor Routes
//!
//! - POST /api/sensor-data - Receive a raw sample from the device
//! - GET /api/sensor-data - Latest enriched reading for the frontend
//! - GET /api/sensor-status - Tiered sensor liveness

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{IngestRequest, IngestResponse, SensorDataResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::sensor::store::SensorStatus;

/// POST /api/sensor-data
///
/// Receives a raw pressure sample from the insole firmware.
/// Expected JSON: `{"pressure": <non-negative number>}`.
///
/// Deserializes through a raw value so a missing or non-numeric
/// `pressure` is a 400 validation error, not an extractor rejection.
pub async fn ingest_sample(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let request: IngestRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::Validation("Invalid data format. Expected {\"pressure\": value}".to_string())
    })?;

    if !request.pressure.is_finite() || request.pressure < 0.0 {
        return Err(ApiError::Validation(
            "Pressure must be a non-negative number".to_string(),
        ));
    }

    let reading = state.store.record(request.pressure.round() as u32).await;

    Ok((
        StatusCode::OK,
        Json(IngestResponse {
            status: "success".to_string(),
            message: "Sensor data received".to_string(),
            data: reading,
        }),
    ))
}

/// GET /api/sensor-data
///
/// The latest reading with derived fields (percentage, age, recency)
/// computed at read time. Before the first sample this serves the zero
/// reading with a null timestamp.
pub async fn latest_reading(State(state): State<Arc<AppState>>) -> Json<SensorDataResponse> {
    let reading = state.store.reading().await;
    Json(SensorDataResponse::success(reading))
}

/// GET /api/sensor-status
///
/// Whether the sensor is actively sending data, based on sample age.
pub async fn sensor_status(State(state): State<Arc<AppState>>) -> Json<SensorStatus> {
    Json(state.store.status().await)
}
