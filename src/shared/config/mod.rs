//! Application configuration module
//!
//! Provides the validated configuration record and its builder. Values can
//! come from code, from a TOML file, or both (file first, then overrides).

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default request timeout applied to every HTTP call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the todo backend, e.g. `http://localhost:8080/Backend`
    pub server_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document into a validated configuration
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file. A missing file is not an error.
    pub fn from_toml_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            validate_url(url)?;
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::MissingValue("request_timeout_secs"));
        }
        Ok(())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidUrl(url.to_string()))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Start from an existing configuration (e.g. one read from a file)
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            server_url: config.server_url,
            request_timeout_secs: config.request_timeout_secs,
        }
    }

    /// Set the server URL. A trailing slash is dropped.
    pub fn server_url(mut self, url: String) -> Self {
        self.server_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set the request timeout
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            request_timeout_secs: self.request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid config file: {0}")]
    Parse(String),
    #[error("could not read config file: {0}")]
    Io(String),
}
