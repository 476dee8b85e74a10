//! Configuration management for TinkerDB
//!
//! Configuration comes from a TOML file or from `TINKERDB_*` environment
//! variables layered over the defaults, and is validated before use.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Default gRPC port, also honored through `TINKERDB_PORT`.
pub const DEFAULT_PORT: u16 = 8080;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// gRPC server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Largest request or response message accepted, in bytes
    pub max_message_size: usize,

    /// Per-request deadline enforced by the transport
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Concurrent in-flight requests allowed per connection
    pub concurrency_limit_per_connection: usize,

    /// How long in-flight requests may drain after a shutdown signal
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve Prometheus metrics
    pub enabled: bool,

    /// Prometheus scrape endpoint address
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_message_size: 4 * 1024 * 1024, // 4 MiB, gRPC default
            request_timeout: Duration::from_secs(30),
            concurrency_limit_per_connection: 256,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9090)),
        }
    }
}

/// Parse `name` from the environment; unset variables yield `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| {
            ConfigError::InvalidValue {
                var: name.to_string(),
                reason: e.to_string(),
            }
        }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables follow the pattern `TINKERDB_<SECTION>_<KEY>`, for example
    /// `TINKERDB_SERVER_BIND_ADDRESS=0.0.0.0:50051`. `TINKERDB_PORT` replaces
    /// only the port of the bind address and is applied last.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::read_file(path.as_ref())?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the TOML file at `path` if given, then `TINKERDB_*`
    /// variables.
    ///
    /// The result is not validated so callers can layer command-line
    /// overrides on top; call [`Config::validate`] once they are applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileReadError {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Overlay `TINKERDB_*` variables onto `self`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server config
        if let Some(addr) = parse_var("TINKERDB_SERVER_BIND_ADDRESS")? {
            self.server.bind_address = addr;
        }
        if let Some(size) = parse_var("TINKERDB_SERVER_MAX_MESSAGE_SIZE")? {
            self.server.max_message_size = size;
        }
        if let Some(port) = parse_var::<u16>("TINKERDB_PORT")? {
            self.server.bind_address.set_port(port);
        }

        // Logging config
        if let Ok(level) = env::var("TINKERDB_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(json) = parse_var("TINKERDB_LOG_JSON")? {
            self.logging.json_format = json;
        }

        // Metrics config
        if let Some(enabled) = parse_var("TINKERDB_METRICS_ENABLED")? {
            self.metrics.enabled = enabled;
        }
        if let Some(addr) = parse_var("TINKERDB_METRICS_BIND_ADDRESS")? {
            self.metrics.bind_address = addr;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_message_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_message_size must be greater than 0".to_string(),
            ));
        }

        if self.server.concurrency_limit_per_connection == 0 {
            return Err(ConfigError::ValidationFailed(
                "concurrency_limit_per_connection must be greater than 0".to_string(),
            ));
        }

        if self.server.request_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        if self.metrics.enabled && self.metrics.bind_address == self.server.bind_address {
            return Err(ConfigError::ValidationFailed(
                "metrics and server cannot share a bind address".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::FileWriteError {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}
