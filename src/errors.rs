//! Error types for BikeSee
//!
//! This module defines the error types for every layer of the application.
//! Location errors are programmer errors and surface as `Err` values; gateway
//! errors are environmental and are folded into the session's operation state
//! by the controller rather than propagated as faults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::session::OperationFailure;

/// Errors raised by the distance function and the network resolver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// Latitude or longitude outside the valid range (or not finite)
    #[error("Invalid coordinate ({latitude}, {longitude}). Latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Resolution was attempted against an empty network catalog
    #[error("Cannot resolve a network from an empty catalog")]
    EmptyCatalog,
}

/// Coarse classification of gateway failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    Network,
    Http4xx,
    Http5xx,
    Decode,
}

impl GatewayErrorKind {
    /// Stable code for logs and display
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Http4xx => "CLIENT_ERROR",
            Self::Http5xx => "SERVER_ERROR",
            Self::Decode => "DECODE_ERROR",
        }
    }
}

/// Remote data gateway errors
///
/// Every remote call resolves to either a payload or one of these variants;
/// the gateway never lets a transport fault escape in any other form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport or connection failure (DNS, refused, reset, timeout)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a 4xx status, including authentication failures
    #[error("Request rejected: HTTP {status}")]
    Http4xx { status: u16 },

    /// Server answered with a 5xx status
    #[error("Server error: HTTP {status}")]
    Http5xx { status: u16 },

    /// Response body was malformed or did not match the expected shape
    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl GatewayError {
    /// Create a network error from any displayable cause
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a decode error from any displayable cause
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify an HTTP status code, returning `None` for success statuses
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400..=499 => Some(Self::Http4xx { status }),
            500..=599 => Some(Self::Http5xx { status }),
            _ => None,
        }
    }

    /// The coarse kind of this error
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            Self::Network { .. } => GatewayErrorKind::Network,
            Self::Http4xx { .. } => GatewayErrorKind::Http4xx,
            Self::Http5xx { .. } => GatewayErrorKind::Http5xx,
            Self::Decode { .. } => GatewayErrorKind::Decode,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::decode(error.to_string());
        }
        if let Some(status) = error.status() {
            if let Some(classified) = Self::from_status(status.as_u16()) {
                return classified;
            }
        }
        Self::network(error.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// HTTP client could not be constructed from the configuration
    #[error("Failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// Session cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// I/O error reading or writing the cache file
    #[error("Session cache I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cached user could not be (de)serialized
    #[error("Session cache at {path} is corrupted")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Coordinate or catalog error
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Remote gateway error
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A named operation failed; its message is user-facing
    #[error(transparent)]
    Operation(#[from] OperationFailure),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable by retrying the same action later
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Gateway(GatewayError::Network { .. })
            | AppError::Gateway(GatewayError::Http5xx { .. }) => true,

            AppError::Operation(failure) => matches!(
                failure.kind,
                GatewayErrorKind::Network | GatewayErrorKind::Http5xx
            ),

            AppError::Location(_)
            | AppError::Gateway(GatewayError::Http4xx { .. })
            | AppError::Gateway(GatewayError::Decode { .. })
            | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Location(_) => "location",
            AppError::Gateway(_) => "gateway",
            AppError::Config(_) => "config",
            AppError::Cache(_) => "cache",
            AppError::Operation(_) => "operation",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Location result type alias
pub type LocationResult<T> = std::result::Result<T, LocationError>;

/// Gateway result type alias
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Session cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;
