//! XStep Sensor Backend
//!
//! Run with: cargo run --bin xstep-server
//!
//! # Configuration
//!
//! Loaded from a TOML file (see `--config`) with environment overrides:
//! - `XSTEP_HOST`: Host to bind to (default: 0.0.0.0)
//! - `XSTEP_PORT`: Port to listen on (default: 5002)
//! - `XSTEP_SIMULATE`: Generate synthetic samples (default: false)
//! - `RUST_LOG`: Log filter (overrides the config log level)

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xstep::api::{serve, AppState};
use xstep::config::Config;
use xstep::sensor::{SensorSimulator, SensorStore};

#[derive(Parser, Debug)]
#[command(name = "xstep-server", about = "Insole sensor backend")]
struct Args {
    /// Path to a TOML config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Run the sample simulator (no hardware needed)
    #[arg(long)]
    simulate: bool,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", xstep::config::generate_default_config());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.simulate {
        config.simulator.enabled = true;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "xstep={},tower_http=debug",
                    config.logging.level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting XStep sensor backend v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(SensorStore::new(config.sensor.clone()));

    // Optional development-mode sample generator
    let simulator = if config.simulator.enabled {
        let sim = Arc::new(SensorSimulator::new(
            Arc::clone(&store),
            config.simulator.clone(),
            config.sensor.clone(),
        ));
        let handle = Arc::clone(&sim).start();
        Some((sim, handle))
    } else {
        tracing::info!("Simulator disabled; waiting for device samples");
        None
    };

    let state = AppState::new(Arc::clone(&store));

    tracing::info!("Starting server on {}", config.server.addr());
    serve(state, &config.server).await?;

    if let Some((sim, handle)) = simulator {
        sim.stop();
        let _ = handle.await;
    }

    tracing::info!("XStep sensor backend stopped");
    Ok(())
}
