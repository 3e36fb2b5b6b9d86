use std::env;
use std::time::Duration;

use crate::channel::Capacity;
use crate::strategies::Variant;
use crate::types::RequestData;

/// Default base URL for the GitHub REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loader configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization whose contributors are loaded
    pub org: String,
    /// Base URL of the remote service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Strategy used to load contributors
    pub variant: Variant,
    /// Capacity of the fan-in channel used by the `CHANNELS` strategy
    pub channel_capacity: Capacity,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let org = env::var("CONTRIBUTORS_ORG")
            .map_err(|_| ConfigError::MissingEnvVar("CONTRIBUTORS_ORG"))?;

        let base_url = env::var("GITHUB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = env::var("CONTRIBUTORS_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CONTRIBUTORS_TIMEOUT_SECS"))?;

        let variant = env::var("CONTRIBUTORS_VARIANT")
            .unwrap_or_else(|_| Variant::Channels.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CONTRIBUTORS_VARIANT"))?;

        let capacity: usize = env::var("CONTRIBUTORS_CHANNEL_CAPACITY")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CONTRIBUTORS_CHANNEL_CAPACITY"))?;

        Ok(Self {
            org,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            variant,
            channel_capacity: Capacity::from(capacity),
        })
    }

    /// Build the request parameters for the configured organization
    pub fn request_data(&self) -> RequestData {
        RequestData::new(&self.org)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

impl From<ConfigError> for crate::error::Error {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
