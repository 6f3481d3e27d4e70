//! Configuration management for waypoint
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::loading::{DEFAULT_STUCK_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_MS};

/// Longest accepted staleness window (one day)
pub const MAX_STUCK_TIMEOUT_MS: u64 = 24 * 60 * 60 * 1000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loading store and sweeper configuration
    pub loading: LoadingConfig,

    /// Content API configuration
    pub api: ApiConfig,

    /// Monitor server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Loading store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// How long a page may stay loading before the sweeper clears it
    pub stuck_timeout_ms: u64,

    /// Time between sweeps
    pub sweep_interval_ms: u64,
}

/// Content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST API
    pub base_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Time between background page refreshes under `serve`
    pub refresh_interval_secs: u64,
}

/// Monitor server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable CORS for the monitor API
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            stuck_timeout_ms: DEFAULT_STUCK_TIMEOUT_MS as u64,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:3000"),
            request_timeout_secs: 30,
            refresh_interval_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let stuck_timeout_ms = env_parse::<u64>("WAYPOINT_STUCK_TIMEOUT_MS")
            .unwrap_or(defaults.loading.stuck_timeout_ms);

        let sweep_interval_ms = env_parse::<u64>("WAYPOINT_SWEEP_INTERVAL_MS")
            .unwrap_or(defaults.loading.sweep_interval_ms);

        let base_url = std::env::var("WAYPOINT_API_URL").unwrap_or(defaults.api.base_url);

        let request_timeout_secs = env_parse::<u64>("WAYPOINT_REQUEST_TIMEOUT")
            .unwrap_or(defaults.api.request_timeout_secs);

        let refresh_interval_secs = env_parse::<u64>("WAYPOINT_REFRESH_INTERVAL")
            .unwrap_or(defaults.api.refresh_interval_secs);

        let bind_address = match std::env::var("WAYPOINT_BIND_ADDRESS") {
            Ok(addr) => addr
                .parse()
                .with_context(|| format!("Invalid WAYPOINT_BIND_ADDRESS: {addr}"))?,
            Err(_) => defaults.server.bind_address,
        };

        let enable_cors = env_parse::<bool>("WAYPOINT_ENABLE_CORS").unwrap_or(defaults.server.enable_cors);

        let log_level = std::env::var("WAYPOINT_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format = std::env::var("WAYPOINT_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            loading: LoadingConfig {
                stuck_timeout_ms,
                sweep_interval_ms,
            },
            api: ApiConfig {
                base_url,
                request_timeout_secs,
                refresh_interval_secs,
            },
            server: ServerConfig {
                bind_address,
                enable_cors,
                enable_request_logging: defaults.server.enable_request_logging,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.loading.stuck_timeout_ms == 0 {
            anyhow::bail!("stuck_timeout_ms must be greater than 0");
        }

        if self.loading.stuck_timeout_ms > MAX_STUCK_TIMEOUT_MS {
            anyhow::bail!(
                "stuck_timeout_ms must be at most {MAX_STUCK_TIMEOUT_MS}, got {}",
                self.loading.stuck_timeout_ms
            );
        }

        if self.loading.sweep_interval_ms == 0 {
            anyhow::bail!("sweep_interval_ms must be greater than 0");
        }

        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.api.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than 0");
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            anyhow::bail!("api.base_url must be an http(s) URL, got '{}'", self.api.base_url);
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Staleness window as a chrono duration
    ///
    /// Values past what chrono can hold saturate instead of wrapping;
    /// `validate` rejects anything above [`MAX_STUCK_TIMEOUT_MS`].
    #[must_use]
    pub fn stuck_timeout(&self) -> chrono::Duration {
        i64::try_from(self.loading.stuck_timeout_ms)
            .ok()
            .and_then(chrono::Duration::try_milliseconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Sweep interval as Duration
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.loading.sweep_interval_ms)
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Background refresh interval as Duration
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.api.refresh_interval_secs)
    }
}
