//! Core application logic for BikeSee
//!
//! This module contains the main application components: geodesy and
//! nearest-network resolution, the remote gateway, the session store, and the
//! controller that runs named operations against them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bikesee::app::{
//!     ApiConfig, ClientConfig, Controller, Coordinate, HttpGateway, SessionStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new(&ClientConfig::default(), ApiConfig::default())?;
//! let store = Arc::new(SessionStore::new());
//! let controller = Controller::new(Arc::new(gateway), Arc::clone(&store));
//!
//! controller.load_catalog().await?;
//! let outcome = controller.locate(Coordinate::new(40.75, -73.9)?).await?;
//! println!("Nearest network: {}", outcome.network);
//!
//! for station in store.stations() {
//!     println!("{}: {} bikes", station.name, station.free_bikes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod controller;
pub mod favorites;
pub mod geo;
pub mod models;
pub mod resolver;
pub mod session;

// Re-export main public API
pub use client::{ApiConfig, BikeApi, ClientConfig, Endpoint, Gateway, HttpGateway, Method};
pub use controller::{Controller, LocateOutcome, OperationResult};
pub use favorites::{FavoriteSynchronizer, ToggleOutcome};
pub use geo::{distance, km_to_miles, Coordinate};
pub use models::{
    AuthMode, Credentials, FavoriteAction, FavoriteSet, Network, NetworkId, Station, StationId,
    User, UserId,
};
pub use resolver::{resolve_network, NetworkTracker};
pub use session::{
    OperationFailure, OperationKind, OperationState, SessionCache, SessionState, SessionStore,
};
