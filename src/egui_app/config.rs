use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "TASKSYNC_API_URL";

/// Directory name used under the platform config and data dirs
const APP_DIR: &str = "tasksync";

/// Backend base URL when nothing is configured.
///
/// The Android emulator reaches the host machine through 10.0.2.2.
pub fn default_server_url() -> &'static str {
    if cfg!(target_os = "android") {
        "http://10.0.2.2:8080/Backend"
    } else {
        "http://localhost:8080/Backend"
    }
}

/// Application configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        let env_url = std::env::var(API_URL_ENV).ok();
        match Self::resolve(AppConfig::default(), env_url) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[CONFIG] Ignoring {}: {}", API_URL_ENV, e);
                Self { app: AppConfig::default() }
            }
        }
    }
}

impl Config {
    /// Create a new configuration from the environment only
    pub fn new() -> Self {
        Self::default()
    }

    /// Full resolution: config file, then `TASKSYNC_API_URL`, then platform default
    pub fn load() -> Result<Self, ConfigError> {
        let file = match Self::config_file_path() {
            Some(path) => Self::read_file(&path)?,
            None => AppConfig::default(),
        };
        Self::resolve(file, std::env::var(API_URL_ENV).ok())
    }

    fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let config = AppConfig::from_toml_file(path)?;
        if config.is_some() {
            tracing::info!("[CONFIG] Loaded {}", path.display());
        }
        Ok(config.unwrap_or_default())
    }

    /// Apply an environment URL override on top of a file configuration
    pub fn resolve(file: AppConfig, env_url: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = AppConfigBuilder::from_config(file);
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.server_url(url.trim().to_string());
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(default_server_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs())
    }

    /// `<config_dir>/tasksync/config.toml`, if the platform has a config dir
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Location of the local key/value database
    pub fn database_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push(APP_DIR);
        path.push("local.db");
        path
    }
}
