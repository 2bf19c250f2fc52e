//! Configuration for the watchlist client

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Backend address used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the backend address
pub const ENV_API_URL: &str = "WHISPER_API_URL";

/// Environment variable holding the poll period in milliseconds
pub const ENV_POLL_INTERVAL_MS: &str = "WHISPER_POLL_INTERVAL_MS";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "WHISPER_TIMEOUT_SECS";

/// Configuration for the watchlist and analysis client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API
    pub api_url: String,

    /// Period between analysis status polls
    pub poll_interval: Duration,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration from `WHISPER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::ConfigError(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::ConfigError(format!(
                "api_url '{}' cannot be used as a base URL",
                self.api_url
            )));
        }
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.poll_interval.is_zero() {
            return Err(ClientError::ConfigError(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_url: Option<String>,
    poll_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    invalid: Vec<String>,
}

impl ClientConfigBuilder {
    /// Set the backend base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the poll period
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load settings from the process environment
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    ///
    /// Values already set on the builder are overwritten by the ones found.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = Some(url);
        }

        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.poll_interval = Some(Duration::from_millis(ms)),
                Err(e) => self
                    .invalid
                    .push(format!("{ENV_POLL_INTERVAL_MS}='{raw}': {e}")),
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout = Some(Duration::from_secs(secs)),
                Err(e) => self.invalid.push(format!("{ENV_TIMEOUT_SECS}='{raw}': {e}")),
            }
        }

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        if !self.invalid.is_empty() {
            return Err(ClientError::ConfigError(self.invalid.join("; ")));
        }

        let defaults = ClientConfig::default();

        let config = ClientConfig {
            api_url: self.api_url.unwrap_or(defaults.api_url),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
