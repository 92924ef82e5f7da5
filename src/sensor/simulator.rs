//! Sensor Simulator
//!
//! Generates synthetic pressure samples for development without the insole
//! hardware attached. Alternates between stance phases (pressure well above
//! the press threshold) and swing phases (near zero), with noise on top.

use crate::config::{SensorConfig, SimulatorConfig};
use crate::sensor::store::SensorStore;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Feeds synthetic samples into a [`SensorStore`] on a fixed period
pub struct SensorSimulator {
    store: Arc<SensorStore>,
    config: SimulatorConfig,
    sensor: SensorConfig,
    running: Arc<AtomicBool>,
}

impl SensorSimulator {
    pub fn new(store: Arc<SensorStore>, config: SimulatorConfig, sensor: SensorConfig) -> Self {
        Self {
            store,
            config,
            sensor,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the generator task
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        self.running.store(true, Ordering::Relaxed);

        tracing::info!(period_ms = self.config.period_ms, "Starting sensor simulator");

        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_millis(self.config.period_ms));
            // Roughly one gait cycle per second at the default period
            let ticks_per_phase = (1000 / self.config.period_ms.max(1)).max(1);
            let mut tick: u64 = 0;

            loop {
                ticker.tick().await;

                if !self.running.load(Ordering::Relaxed) {
                    break;
                }

                let pressure = self.next_pressure(tick / ticks_per_phase % 2 == 0);
                self.store.record(pressure).await;
                tick += 1;
            }

            tracing::info!("Sensor simulator stopped");
        })
    }

    /// Stop generating samples
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    fn next_pressure(&self, stance: bool) -> u32 {
        let mut rng = rand::thread_rng();
        if stance {
            // Stance: loaded insole, comfortably above the press threshold
            let base = self.sensor.press_threshold + self.sensor.adc_max / 8;
            let hi = (self.sensor.adc_max / 2).max(base + 1);
            rng.gen_range(base..hi)
        } else {
            // Swing: unloaded, just noise
            rng.gen_range(0..(self.sensor.press_threshold / 4).max(1))
        }
    }
}
