//! BikeSee Library
//!
//! A Rust library for finding bike-share networks and stations near a
//! location. Resolves the nearest network from the public catalog, loads live
//! station availability, and keeps a signed-in user's favorite stations in
//! sync with a users backend.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(env::CATALOG_URL, "BIKESEE_CATALOG_URL");
        assert_eq!(session::CACHE_FILE_NAME, "bike-user.json");
        assert!(http::USER_AGENT.contains("BikeSee"));
    }

    #[test]
    fn test_error_types() {
        let location_error = errors::LocationError::EmptyCatalog;
        let app_error = AppError::Location(location_error);

        assert_eq!(app_error.category(), "location");
        assert!(!app_error.is_recoverable());
    }
}
