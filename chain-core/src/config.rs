//! Configuration for the audit chain service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory holding one JSON file per sealed block
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// HTTP listen address
    pub http_listen_addr: String,

    /// Publish scheduler configuration
    pub publish: PublishConfig,

    /// Request validation limits
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/blocks"),
            service_name: "randledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            http_listen_addr: "0.0.0.0:8081".to_string(),
            publish: PublishConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Publish scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Seconds between publish cycles
    pub interval_secs: u64,

    /// Number of delay slots in the deferred write buffer
    pub deferred_slots: usize,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            deferred_slots: 10,
        }
    }
}

/// Bounds enforced on generation requests before they reach the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Smallest accepted range bound
    pub min_value: f64,

    /// Largest accepted range bound
    pub max_value: f64,

    /// Largest accepted value count per request
    pub max_count: u32,

    /// Span applied when a request carries an inverted or empty range
    pub default_span: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_value: -1_000_000.0,
            max_value: 1_000_000.0,
            max_count: 10_000_000,
            default_span: 100.0,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("RANDLEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(addr) = std::env::var("RANDLEDGER_HTTP_ADDR") {
            config.http_listen_addr = addr;
        }

        if let Ok(interval) = std::env::var("RANDLEDGER_PUBLISH_INTERVAL_SECS") {
            config.publish.interval_secs = interval
                .parse()
                .map_err(|e| crate::Error::Config(format!("invalid publish interval: {e}")))?;
        }

        Ok(config)
    }
}
