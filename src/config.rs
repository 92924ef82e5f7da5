//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub sensor: SensorConfig,

    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sensor interpretation settings
///
/// Thresholds match the insole firmware: raw readings come from a 12-bit
/// ADC, and a press is registered above 500.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_press_threshold")]
    pub press_threshold: u32,

    #[serde(default = "default_adc_max")]
    pub adc_max: u32,

    #[serde(default = "default_recent_window")]
    pub recent_window_secs: i64,

    #[serde(default = "default_stale_window")]
    pub stale_window_secs: i64,
}

fn default_press_threshold() -> u32 {
    500
}

fn default_adc_max() -> u32 {
    4095
}

fn default_recent_window() -> i64 {
    5
}

fn default_stale_window() -> i64 {
    30
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            press_threshold: default_press_threshold(),
            adc_max: default_adc_max(),
            recent_window_secs: default_recent_window(),
            stale_window_secs: default_stale_window(),
        }
    }
}

/// Simulator configuration
///
/// When enabled, a background task feeds synthetic pressure samples into
/// the store so the service can be developed without hardware attached.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_sim_period")]
    pub period_ms: u64,
}

fn default_sim_period() -> u64 {
    200
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period_ms: default_sim_period(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("xstep").join("config.toml")),
            Some(PathBuf::from("/etc/xstep/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("XSTEP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("XSTEP_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(simulate) = std::env::var("XSTEP_SIMULATE") {
            self.simulator.enabled = simulate.to_lowercase() != "false" && simulate != "0";
        }

        if let Ok(level) = std::env::var("XSTEP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("XSTEP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sensor: SensorConfig::default(),
            simulator: SimulatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# XStep Configuration
#
# Environment variables override these settings:
# - XSTEP_HOST
# - XSTEP_PORT
# - XSTEP_SIMULATE
# - XSTEP_LOG_LEVEL
# - XSTEP_LOG_FORMAT

[server]
# API server host
host = "0.0.0.0"

# API server port
port = 5002

# Allowed CORS origins (the mobile web frontend)
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

[sensor]
# Raw pressure above this counts as a foot press (matches firmware)
press_threshold = 500

# Full-scale ADC reading used for the percentage conversion
adc_max = 4095

# A reading younger than this (seconds) is considered recent
recent_window_secs = 5

# A reading older than this (seconds) means the sensor is disconnected
stale_window_secs = 30

[simulator]
# Generate synthetic pressure samples instead of waiting for hardware
enabled = false

# How often to generate a sample (ms)
period_ms = 200

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5002);
        assert_eq!(config.sensor.press_threshold, 500);
        assert_eq!(config.sensor.adc_max, 4095);
        assert!(!config.simulator.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[server]\nport = 6001\n\n[sensor]\npress_threshold = 800\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.sensor.press_threshold, 800);
        // Unspecified sections keep their defaults
        assert_eq!(config.sensor.adc_max, 4095);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        // No other test reads these variables, so this stays parallel-safe
        std::env::set_var("XSTEP_PORT", "7010");
        std::env::set_var("XSTEP_SIMULATE", "true");
        std::env::set_var("XSTEP_LOG_LEVEL", "debug");

        let config = Config::from_env();

        std::env::remove_var("XSTEP_PORT");
        std::env::remove_var("XSTEP_SIMULATE");
        std::env::remove_var("XSTEP_LOG_LEVEL");

        assert_eq!(config.server.port, 7010);
        assert!(config.simulator.enabled);
        assert_eq!(config.logging.level, "debug");
        // Untouched settings keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 5002);
        assert_eq!(config.sensor.recent_window_secs, 5);
    }
}
