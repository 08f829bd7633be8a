//! Remote data gateway
//!
//! Every remote call in the application goes through the [`Gateway`] trait,
//! whose single method returns either a JSON payload or a [`GatewayError`].
//! Nothing above this boundary ever sees a transport fault in another form,
//! and nothing here retries: retry policy belongs to callers.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and remote host URLs
//! - `http`: reqwest-backed gateway with client-side rate limiting
//! - `api`: typed facade decoding payloads into domain models

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::models::{NetworkId, StationId, UserId};
use crate::errors::GatewayResult;

pub mod api;
pub mod config;
pub mod http;

pub use api::BikeApi;
pub use config::{ApiConfig, ClientConfig};
pub use http::HttpGateway;

/// HTTP verbs used by the remote endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// Which remote host serves an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// Public network catalog and station inventories
    Catalog,
    /// Users and favorites backend
    Users,
}

/// Remote endpoints known to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/networks`
    Networks,
    /// `/networks/{id}`
    Network(NetworkId),
    /// `/users`
    Login,
    /// `/users/new`
    Signup,
    /// `/users/{id}/favorites`
    Favorites(UserId),
    /// `/users/{id}/favorites/{station}`
    Favorite { user: UserId, station: StationId },
}

impl Endpoint {
    pub fn host(&self) -> Host {
        match self {
            Self::Networks | Self::Network(_) => Host::Catalog,
            Self::Login | Self::Signup | Self::Favorites(_) | Self::Favorite { .. } => Host::Users,
        }
    }

    /// Unencoded path segments relative to the host's base URL
    ///
    /// Ids are always a single segment of their own, whatever they contain.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Networks => vec!["networks"],
            Self::Network(id) => vec!["networks", id.as_str()],
            Self::Login => vec!["users"],
            Self::Signup => vec!["users", "new"],
            Self::Favorites(user) => vec!["users", user.as_str(), "favorites"],
            Self::Favorite { user, station } => {
                vec!["users", user.as_str(), "favorites", station.as_str()]
            }
        }
    }

    /// Path relative to the host's base URL, without a leading slash
    pub fn path(&self) -> String {
        self.segments().join("/")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Uniform contract for remote calls
///
/// Implementations must never panic on remote failures; every outcome is a
/// tagged `Result`. An empty response body is returned as `Value::Null`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn call(
        &self,
        method: Method,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> GatewayResult<Value>;
}
