//! Sensor Domain
//!
//! The latest-sample store, the enriched reading type served to clients,
//! and the development-mode sample simulator.
//!
//! The device firmware POSTs raw pressure values; everything derived from
//! them (percentage, press flag, freshness) is computed here at read time.

pub mod simulator;
pub mod store;
pub mod types;

pub use simulator::SensorSimulator;
pub use store::{SensorStatus, SensorStore, StatusTier};
pub use types::Reading;
