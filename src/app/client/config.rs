//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the reqwest
//! client behind the HTTP gateway, and the base URLs of the two remote hosts.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{api, http, limits};
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(ConfigError::HttpClient)
    }
}

/// Base URLs of the remote hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    catalog_base_url: Url,
    users_base_url: Url,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: Url::parse(api::CATALOG_BASE_URL)
                .expect("Catalog base URL should be valid"),
            users_base_url: Url::parse(api::USERS_BASE_URL)
                .expect("Users base URL should be valid"),
        }
    }
}

impl ApiConfig {
    /// Create an API configuration from two base URLs
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if either URL does not parse or is
    /// not http(s).
    pub fn new(catalog_base_url: &str, users_base_url: &str) -> ConfigResult<Self> {
        Ok(Self {
            catalog_base_url: parse_base_url("catalog_base_url", catalog_base_url)?,
            users_base_url: parse_base_url("users_base_url", users_base_url)?,
        })
    }

    pub fn catalog_base_url(&self) -> &Url {
        &self.catalog_base_url
    }

    pub fn users_base_url(&self) -> &Url {
        &self.users_base_url
    }
}

fn parse_base_url(field: &str, value: &str) -> ConfigResult<Url> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("Only http and https URLs are supported".to_string()));
    }
    Ok(url)
}
