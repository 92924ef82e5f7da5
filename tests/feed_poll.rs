//! Feed polling tests
//!
//! Runs the feed against real HTTP servers bound to ephemeral ports:
//! the actual backend router for the happy path, and scripted routers
//! for failure injection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xstep::api::AppState;
use xstep::config::SensorConfig;
use xstep::feed::{ConnectionStatus, FeedConfig, SensorFeed};
use xstep::sensor::{Reading, SensorStore};

/// Bind a router to an ephemeral port and return its base URL
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn feed_config(base_url: String) -> FeedConfig {
    FeedConfig {
        base_url,
        poll_interval_ms: 50,
        request_timeout_ms: 1000,
    }
}

fn sample_reading(pressure: u32, is_recent: bool) -> Reading {
    Reading {
        pressure,
        pressure_percentage: pressure as f64 / 4095.0 * 100.0,
        foot_press_detected: pressure > 500,
        timestamp: Some(Utc::now()),
        seconds_since_last_reading: Some(if is_recent { 1 } else { 20 }),
        is_recent,
    }
}

fn envelope(reading: &Reading) -> serde_json::Value {
    serde_json::json!({ "status": "success", "data": reading })
}

#[tokio::test]
async fn test_successful_fetch_updates_reading_and_connection() {
    let store = Arc::new(SensorStore::new(SensorConfig::default()));
    store.record(620).await;

    let base_url = spawn_server(xstep::build_router(AppState::new(Arc::clone(&store)))).await;
    let feed = SensorFeed::new(feed_config(base_url));

    let reading = feed.fetch_once().await.expect("fetch should succeed");
    assert_eq!(reading.pressure, 620);

    let state = feed.snapshot().await;
    assert_eq!(state.connection.status, ConnectionStatus::Connected);
    assert_eq!(state.connection.message, "Receiving sensor data");
    assert!(state.connection.last_update.is_some());
    assert!(state.error.is_none());
    assert_eq!(state.reading, reading);

    // 620 is above the press threshold and just recorded
    assert!(feed.is_connected().await);
    assert!(feed.has_recent_data().await);
    assert!(feed.foot_press_active().await);
}

#[tokio::test]
async fn test_http_error_flips_state_but_retains_reading() {
    // First request succeeds, every later one returns 500
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/api/sensor-data",
        get(
            |State(calls): State<Arc<AtomicUsize>>| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Json(envelope(&sample_reading(900, true))).into_response()
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
        ),
    )
    .with_state(Arc::clone(&calls));

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(feed_config(base_url));

    assert!(feed.fetch_once().await.is_some());
    assert!(feed.fetch_once().await.is_none());

    let state = feed.snapshot().await;
    assert_eq!(state.connection.status, ConnectionStatus::Error);
    assert_eq!(
        state.connection.message,
        "Connection error: HTTP error! status: 500"
    );
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 500"));

    // The previous reading stays visible while the status flips
    assert_eq!(state.reading.pressure, 900);
    assert!(!feed.is_connected().await);
}

#[tokio::test]
async fn test_wrong_status_field_is_invalid_format() {
    let router = Router::new().route(
        "/api/sensor-data",
        get(|| async { Json(serde_json::json!({ "status": "error", "data": null })) }),
    );

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(feed_config(base_url));

    assert!(feed.fetch_once().await.is_none());

    let state = feed.snapshot().await;
    assert_eq!(state.connection.status, ConnectionStatus::Error);
    assert_eq!(state.error.as_deref(), Some("Invalid response format"));
}

#[tokio::test]
async fn test_missing_data_field_is_invalid_format() {
    let router = Router::new().route(
        "/api/sensor-data",
        get(|| async { Json(serde_json::json!({ "status": "success" })) }),
    );

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(feed_config(base_url));

    assert!(feed.fetch_once().await.is_none());
    assert_eq!(
        feed.last_error().await.as_deref(),
        Some("Invalid response format")
    );
}

#[tokio::test]
async fn test_timeout_surfaces_error_state() {
    let router = Router::new().route(
        "/api/sensor-data",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(envelope(&sample_reading(100, true)))
        }),
    );

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(FeedConfig {
        base_url,
        poll_interval_ms: 50,
        request_timeout_ms: 100,
    });

    assert!(feed.fetch_once().await.is_none());

    let state = feed.snapshot().await;
    assert_eq!(state.connection.status, ConnectionStatus::Error);
    assert_eq!(state.error.as_deref(), Some("Request timeout"));
}

#[tokio::test]
async fn test_stale_press_is_not_active() {
    let router = Router::new().route(
        "/api/sensor-data",
        get(|| async { Json(envelope(&sample_reading(900, false))) }),
    );

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(feed_config(base_url));

    let reading = feed.fetch_once().await.unwrap();
    assert!(reading.foot_press_detected);
    assert!(!reading.is_recent);

    // Pressed but stale must not show as active
    assert!(feed.is_connected().await);
    assert!(!feed.has_recent_data().await);
    assert!(!feed.foot_press_active().await);
}

#[tokio::test]
async fn test_polling_runs_one_timer_and_stops_cleanly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/api/sensor-data",
        get(
            |State(calls): State<Arc<AtomicUsize>>| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(envelope(&sample_reading(200, true)))
            },
        ),
    )
    .with_state(Arc::clone(&calls));

    let base_url = spawn_server(router).await;
    let feed = Arc::new(SensorFeed::new(FeedConfig {
        base_url,
        poll_interval_ms: 100,
        request_timeout_ms: 1000,
    }));

    // A second start must not add a second timer
    Arc::clone(&feed).start();
    Arc::clone(&feed).start();

    tokio::time::sleep(Duration::from_millis(550)).await;
    let while_running = calls.load(Ordering::SeqCst);

    // One timer at 100 ms produces roughly 6 fetches in 550 ms;
    // a duplicate timer would roughly double that
    assert!(while_running >= 3, "expected polling, got {}", while_running);
    assert!(
        while_running <= 9,
        "expected a single timer, got {} fetches",
        while_running
    );

    feed.stop();
    // Allow any in-flight request to settle
    tokio::time::sleep(Duration::from_millis(150)).await;
    let after_stop = calls.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        calls.load(Ordering::SeqCst),
        after_stop,
        "no fetch may be scheduled after stop"
    );
}

#[tokio::test]
async fn test_check_status_returns_payload_without_touching_state() {
    let store = Arc::new(SensorStore::new(SensorConfig::default()));
    store.record(300).await;

    let base_url = spawn_server(xstep::build_router(AppState::new(store))).await;
    let feed = SensorFeed::new(feed_config(base_url));

    let status = feed.check_status().await.expect("status should be available");
    assert_eq!(status["status"], "active");
    assert_eq!(status["message"], "Sensor is actively sending data");

    // The status path never mutates connection state
    let state = feed.snapshot().await;
    assert_eq!(state.connection.status, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_documented_example_reading() {
    // The documented example: 620 raw / 62% / pressed / recent
    let reading = Reading {
        pressure: 620,
        pressure_percentage: 62.0,
        foot_press_detected: true,
        timestamp: Some(Utc::now()),
        seconds_since_last_reading: Some(1),
        is_recent: true,
    };

    let router = Router::new().route(
        "/api/sensor-data",
        get({
            let body = envelope(&reading);
            move || async move { Json(body) }
        }),
    );

    let base_url = spawn_server(router).await;
    let feed = SensorFeed::new(feed_config(base_url));

    let fetched = feed.fetch_once().await.unwrap();
    assert_eq!(fetched, reading);

    let state = feed.snapshot().await;
    assert!(state.foot_press_active());
    assert_eq!(state.connection.message, "Receiving sensor data");
}
