//! reqwest-backed gateway with client-side rate limiting
//!
//! This module maps [`Endpoint`]s onto the configured hosts, sends requests
//! through a shared reqwest client, and classifies every outcome into the
//! gateway's success/failure contract. Requests are never retried.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::config::{ApiConfig, ClientConfig};
use super::{Endpoint, Gateway, Host, Method};
use crate::errors::{ConfigError, ConfigResult, GatewayError, GatewayResult};

/// HTTP implementation of [`Gateway`]
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
    api: ApiConfig,
}

impl HttpGateway {
    /// Creates a gateway from client settings and host URLs
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built or the rate
    /// limit is zero
    pub fn new(config: &ClientConfig, api: ApiConfig) -> ConfigResult<Self> {
        let client = config.build_http_client()?;
        let rate_limiter = Self::build_rate_limiter(config.rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
            api,
        })
    }

    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> ConfigResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let rate = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rate)))
    }

    /// Absolute URL for an endpoint on its host
    pub fn url_for(&self, endpoint: &Endpoint) -> GatewayResult<Url> {
        let base = match endpoint.host() {
            Host::Catalog => self.api.catalog_base_url(),
            Host::Users => self.api.users_base_url(),
        };
        let segments = endpoint.segments();
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(GatewayError::network(format!(
                "invalid path segment {bad:?} for {endpoint}"
            )));
        }

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::network(format!("base URL {base} cannot take a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call(
        &self,
        method: Method,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let url = self.url_for(endpoint)?;
        self.rate_limiter.until_ready().await;

        let request = match method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Delete => self.client.delete(url.clone()),
        };
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        tracing::debug!("{} {}", method, url);
        let response = request.send().await.map_err(|e| {
            tracing::debug!("{} {} failed in transport: {}", method, url, e);
            GatewayError::from(e)
        })?;

        let status = response.status();
        if let Some(error) = GatewayError::from_status(status.as_u16()) {
            tracing::debug!("{} {} answered {}", method, url, status);
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(GatewayError::from)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let payload = serde_json::from_slice(&bytes)?;
        tracing::debug!("{} {} succeeded ({} bytes)", method, url, bytes.len());
        Ok(payload)
    }
}
