//! Application constants for BikeSee
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for endpoint overrides
pub mod env {
    /// Overrides the catalog (networks and stations) base URL
    pub const CATALOG_URL: &str = "BIKESEE_CATALOG_URL";

    /// Overrides the users/favorites base URL
    pub const USERS_URL: &str = "BIKESEE_USERS_URL";
}

/// Remote service locations
pub mod api {
    /// Public CityBikes API serving the network catalog and station inventories
    pub const CATALOG_BASE_URL: &str = "http://api.citybik.es/v2";

    /// Users and favorites backend
    pub const USERS_BASE_URL: &str = "http://localhost:3001/api/v1";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "BikeSee/0.1.0 (Bike Share Finder)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting configuration
pub mod limits {
    /// Default client-side rate limit (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;
}

/// Geodesy constants
pub mod geo {
    /// Mean Earth radius (IUGG) in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6371.0088;

    /// Kilometres in one statute mile
    pub const KM_PER_MILE: f64 = 1.609_344;

    /// Tolerance used when comparing distances for equality
    pub const DISTANCE_EPSILON_KM: f64 = 1e-9;
}

/// Local session persistence
pub mod session {
    /// Directory name under the user config dir
    pub const CONFIG_DIR_NAME: &str = "bikesee";

    /// File name of the cached signed-in user
    pub const CACHE_FILE_NAME: &str = "bike-user.json";
}

/// User-facing operation failure messages
pub mod messages {
    pub const CATALOG_FAILED: &str = "Error getting networks.";
    pub const STATIONS_FAILED: &str = "Error getting stations.";
    pub const LOGIN_FAILED: &str = "Error signing in.";
    pub const SIGNUP_FAILED: &str = "Error creating account.";
    pub const FAVORITES_FAILED: &str = "Error getting favorites.";
    pub const ADD_FAVORITE_FAILED: &str = "Error adding favorite.";
    pub const REMOVE_FAVORITE_FAILED: &str = "Error removing favorite.";
}
