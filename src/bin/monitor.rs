//! XStep Monitor
//!
//! Command-line consumer of the sensor feed: polls the backend and logs
//! readings and connection-state changes. Useful for checking a deployment
//! without the mobile frontend.
//!
//! Run with: cargo run --bin xstep-monitor -- --base-url http://localhost:5002

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xstep::feed::{FeedConfig, FeedEvent, SensorFeed};

#[derive(Parser, Debug)]
#[command(name = "xstep-monitor", about = "Poll the sensor backend and log readings")]
struct Args {
    /// Base URL of the sensor backend
    #[arg(long, default_value = "http://localhost:5002")]
    base_url: String,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// How long to monitor before exiting (seconds); 0 runs until Ctrl+C
    #[arg(long, default_value_t = 0)]
    duration_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xstep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FeedConfig {
        base_url: args.base_url,
        poll_interval_ms: args.interval_ms,
        request_timeout_ms: args.timeout_ms,
    };

    tracing::info!(base_url = %config.base_url, "Monitoring sensor backend");

    let feed = Arc::new(SensorFeed::new(config).with_observer(|event| match event {
        FeedEvent::ReadingReceived { pressure } => {
            tracing::debug!(pressure, "Reading received");
        }
        FeedEvent::FetchFailed { message } => {
            tracing::warn!(%message, "Fetch failed");
        }
        FeedEvent::Started => tracing::info!("Polling started"),
        FeedEvent::Stopped => tracing::info!("Polling stopped"),
    }));

    // One-off status check before polling begins
    match feed.check_status().await {
        Some(status) => tracing::info!(status = %status, "Sensor status"),
        None => tracing::warn!("Sensor status unavailable"),
    }

    Arc::clone(&feed).start();

    let report = {
        let feed = Arc::clone(&feed);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                ticker.tick().await;

                let state = feed.snapshot().await;
                if state.is_connected() {
                    tracing::info!(
                        pressure = state.reading.pressure,
                        percentage = %format_args!("{:.1}", state.reading.pressure_percentage),
                        press_active = state.foot_press_active(),
                        recent = state.has_recent_data(),
                        "Sensor"
                    );
                } else {
                    tracing::warn!(message = %state.connection.message, "Sensor");
                }
            }
        })
    };

    if args.duration_secs > 0 {
        tokio::time::sleep(std::time::Duration::from_secs(args.duration_secs)).await;
    } else {
        tokio::signal::ctrl_c().await?;
    }

    feed.stop();
    report.abort();

    Ok(())
}
