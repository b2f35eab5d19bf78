//! Configuration loading with precedence handling.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. `telemetry-dashboard.toml` in the working directory, or the file named by
//!    `TELEMETRY_CONFIG`
//! 3. Environment variables such as `TELEMETRY__API__BASE_URL`

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use telemetry_application::ResponseOrdering;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "telemetry-dashboard.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TELEMETRY_CONFIG";

const ENV_PREFIX: &str = "TELEMETRY";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),

    /// The base URL does not parse.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Parse error details.
        reason: String,
    },
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Search behaviour.
    pub search: SearchConfig,
    /// Export delivery.
    pub downloads: DownloadConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User-Agent header value.
    pub user_agent: String,
    /// Endpoint paths relative to `base_url`.
    pub endpoints: EndpointConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1/vehicle_data".to_string(),
            timeout_ms: 10_000,
            user_agent: concat!("telemetry-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoints: EndpointConfig::default(),
        }
    }
}

/// Endpoint paths relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Vehicle id listing.
    pub vehicle_ids: String,
    /// Paged record query.
    pub vehicle_data: String,
    /// Sample data population.
    pub populate: String,
    /// File export.
    pub export: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            vehicle_ids: "/vehicle_ids".to_string(),
            vehicle_data: "/".to_string(),
            populate: "/populate".to_string(),
            export: "/export".to_string(),
        }
    }
}

/// Search behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which response wins when searches overlap.
    pub response_ordering: ResponseOrdering,
}

/// Export delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Target directory; the platform download directory when unset.
    pub directory: Option<PathBuf>,
}

impl DownloadConfig {
    /// The directory exports are written to.
    ///
    /// Falls back to the platform download directory, then the working
    /// directory.
    #[must_use]
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl DashboardConfig {
    /// Loads configuration from the default file location and environment.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or the base URL is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&file, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Loads configuration from `file` (optional) layered under `env`.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or the base URL is invalid.
    pub fn load_from(file: &Path, env: Environment) -> Result<Self, ConfigError> {
        let loaded: Self = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(file = %file.display(), base_url = %loaded.api.base_url, "configuration loaded");
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api.base_url)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.api.base_url.clone(),
                reason: e.to_string(),
            })
    }
}
