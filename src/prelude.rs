//! Prelude module for BikeSee Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use bikesee::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bikesee::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let gateway = HttpGateway::new(&ClientConfig::default(), ApiConfig::default())?;
//!     let store = Arc::new(SessionStore::new());
//!     let controller = Arc::new(Controller::new(Arc::new(gateway), Arc::clone(&store)));
//!     let favorites = FavoriteSynchronizer::new(Arc::clone(&controller));
//!
//!     controller.load_catalog().await?;
//!     // Continue with locate / toggle...
//!     # let _ = favorites;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, GatewayError, LocationError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Remote access
    ApiConfig,
    ClientConfig,
    Gateway,
    HttpGateway,

    // Orchestration
    Controller,
    FavoriteSynchronizer,
    LocateOutcome,
    ToggleOutcome,

    // Session
    OperationFailure,
    OperationState,
    SessionCache,
    SessionState,
    SessionStore,

    // Data types
    AuthMode,
    Coordinate,
    Credentials,
    Network,
    NetworkId,
    Station,
    StationId,
    User,
    UserId,

    // Geodesy
    distance,
    resolve_network,
};

// Configuration
pub use crate::config::AppConfig;

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
