//! Configuration management for BikeSee
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, multi-source loading, and zero-config defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ApiConfig, ClientConfig, SessionCache};
use crate::constants::{api, env, http, limits, session};
use crate::errors::{AppError, ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Remote host settings
    pub api: ApiConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Session persistence settings
    pub session: SessionConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly remote host configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfigToml {
    /// Base URL of the network catalog
    pub catalog_base_url: String,
    /// Base URL of the users and favorites backend
    pub users_base_url: String,
}

impl Default for ApiConfigToml {
    fn default() -> Self {
        Self {
            catalog_base_url: api::CATALOG_BASE_URL.to_string(),
            users_base_url: api::USERS_BASE_URL.to_string(),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive_secs: Some(30),
            tcp_nodelay: true,
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly session configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SessionConfigToml {
    /// Cached user file (None = user config directory)
    pub cache_file: Option<PathBuf>,
    /// Sign the cached user back in on startup
    pub restore_on_start: Option<bool>,
}

/// Runtime session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub cache_file: PathBuf,
    pub restore_on_start: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_file: SessionCache::default_path(),
            restore_on_start: true,
        }
    }
}

impl SessionConfig {
    pub fn cache(&self) -> SessionCache {
        SessionCache::new(&self.cache_file)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed base URLs or a zero
    /// rate limit.
    pub fn to_runtime_config(&self) -> ConfigResult<(ClientConfig, ApiConfig, SessionConfig)> {
        Ok((
            self.client.to_runtime_config()?,
            self.api.to_runtime_config()?,
            self.session.to_runtime_config(),
        ))
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = if let Some(ref path) = config_file_override {
            Some(path.clone())
        } else {
            Self::find_config_file()
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply endpoint overrides from the environment
    ///
    /// `lookup` resolves a variable name to its value; empty values are
    /// ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(env::CATALOG_URL) {
            debug!("Catalog base URL overridden by {}", env::CATALOG_URL);
            self.api.catalog_base_url = url;
        }
        if let Some(url) = non_empty(env::USERS_URL) {
            debug!("Users base URL overridden by {}", env::USERS_URL);
            self.api.users_base_url = url;
        }
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<Option<PathBuf>> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(Some(config_path));
        }

        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::generic(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let config_content = Self::generate_default_config_content();

        tokio::fs::write(&config_path, config_content)
            .await
            .map_err(|e| {
                AppError::generic(format!(
                    "Failed to write config file {}: {}",
                    config_path.display(),
                    e
                ))
            })?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(Some(config_path))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            // Project-local config
            PathBuf::from("./bikesee.toml"),
            PathBuf::from("./config.toml"),
        ];
        if let Ok(user_config) = Self::get_default_config_path() {
            search_paths.push(user_config);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir.join(session::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::generic(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::from)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# BikeSee Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[api]
# Public bike-share catalog (networks and live station data)
catalog_base_url = "{}"
# Users and favorites backend
users_base_url = "{}"

[client]
# HTTP client settings
tcp_keepalive_secs = 30
tcp_nodelay = true
pool_idle_timeout_secs = {}
pool_max_per_host = {}
request_timeout_secs = {}
connect_timeout_secs = {}
rate_limit_rps = {}

[session]
# Where the signed-in user is remembered (leave unset for the default)
# cache_file = "/path/to/{}"
restore_on_start = true

[logging]
# Logging configuration
level = "warn"  # error, warn, info, debug, trace
colored_output = true
"#,
            api::CATALOG_BASE_URL,
            api::USERS_BASE_URL,
            http::POOL_IDLE_TIMEOUT.as_secs(),
            http::POOL_MAX_PER_HOST,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            limits::DEFAULT_RATE_LIMIT_RPS,
            session::CACHE_FILE_NAME,
        )
    }
}

impl ApiConfigToml {
    /// Convert to runtime ApiConfig
    pub fn to_runtime_config(&self) -> ConfigResult<ApiConfig> {
        ApiConfig::new(&self.catalog_base_url, &self.users_base_url)
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        if self.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be at least 1 request per second".to_string(),
            });
        }

        Ok(ClientConfig {
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
        })
    }
}

impl SessionConfigToml {
    /// Convert to runtime SessionConfig
    pub fn to_runtime_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            cache_file: self.cache_file.clone().unwrap_or(defaults.cache_file),
            restore_on_start: self.restore_on_start.unwrap_or(defaults.restore_on_start),
        }
    }
}
