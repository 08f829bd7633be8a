//! Session state store
//!
//! The store is the only mutable state shared between operations. Every
//! mutation takes the write lock once and leaves the state consistent before
//! releasing it, so readers never observe a partial write. Mutations are
//! crate-private: only the resolver, controller and favorite synchronizer
//! change session state; the presentation layer reads snapshots.

use parking_lot::RwLock;
use tracing::debug;

use super::operation::{OperationState, OperationTracker, OperationTransition};
use crate::app::models::{FavoriteSet, Network, NetworkId, Station, StationId, User, UserId};

/// Point-in-time copy of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub catalog: Vec<Network>,
    /// Network whose stations are currently loaded
    pub network: Option<NetworkId>,
    pub stations: Vec<Station>,
    pub favorites: FavoriteSet,
    pub operation: OperationState,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Catalog entry of the network whose stations are loaded
    pub fn current_network(&self) -> Option<&Network> {
        let id = self.network.as_ref()?;
        self.catalog.iter().find(|network| &network.id == id)
    }

    /// Loaded stations that are in the favorite set
    pub fn favorite_stations(&self) -> Vec<&Station> {
        self.stations
            .iter()
            .filter(|station| self.favorites.contains(&station.id))
            .collect()
    }
}

/// Change applied to the favorite set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesUpdate {
    /// Replace the whole set with the remote copy
    Replace(FavoriteSet),
    /// Add one station; no-op if present
    Insert(StationId),
    /// Remove one station; no-op if absent
    Remove(StationId),
}

#[derive(Debug, Default)]
struct StoreState {
    user: Option<User>,
    catalog: Vec<Network>,
    network: Option<NetworkId>,
    stations: Vec<Station>,
    favorites: FavoriteSet,
    operations: OperationTracker,
}

/// Process-wide session state, shared by `Arc`
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<StoreState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent copy of every field
    pub fn snapshot(&self) -> SessionState {
        let state = self.state.read();
        SessionState {
            user: state.user.clone(),
            catalog: state.catalog.clone(),
            network: state.network.clone(),
            stations: state.stations.clone(),
            favorites: state.favorites.clone(),
            operation: state.operations.state(),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn catalog(&self) -> Vec<Network> {
        self.state.read().catalog.clone()
    }

    pub fn current_network(&self) -> Option<NetworkId> {
        self.state.read().network.clone()
    }

    pub fn stations(&self) -> Vec<Station> {
        self.state.read().stations.clone()
    }

    pub fn favorites(&self) -> FavoriteSet {
        self.state.read().favorites.clone()
    }

    pub fn is_favorite(&self, station: &StationId) -> bool {
        self.state.read().favorites.contains(station)
    }

    pub fn operation_state(&self) -> OperationState {
        self.state.read().operations.state()
    }

    /// Sign a user in. Switching to a different user drops the previous
    /// user's favorites.
    pub(crate) fn set_user(&self, user: User) {
        let mut state = self.state.write();
        let same_user = state.user.as_ref().map(|current| &current.id) == Some(&user.id);
        if !same_user {
            state.favorites.clear();
        }
        debug!("Session user set to {}", user.id);
        state.user = Some(user);
    }

    /// Sign out: forget the user, their favorites and the loaded stations
    pub(crate) fn clear_session(&self) {
        let mut state = self.state.write();
        state.user = None;
        state.favorites.clear();
        state.stations.clear();
        state.network = None;
        debug!("Session cleared");
    }

    pub(crate) fn set_catalog(&self, catalog: Vec<Network>) {
        let mut state = self.state.write();
        debug!("Catalog replaced with {} networks", catalog.len());
        state.catalog = catalog;
    }

    pub(crate) fn set_stations(&self, network: NetworkId, stations: Vec<Station>) {
        let mut state = self.state.write();
        debug!("Stations replaced with {} from {}", stations.len(), network);
        state.network = Some(network);
        state.stations = stations;
    }

    /// Apply a favorite change on behalf of `user`
    ///
    /// Returns `false` without touching the set when `user` is no longer the
    /// signed-in user, so a response that lands after sign-out (or after a
    /// different user signed in) cannot leak into the current session.
    pub(crate) fn set_favorites(&self, user: &UserId, update: FavoritesUpdate) -> bool {
        let mut state = self.state.write();
        if state.user.as_ref().map(|current| &current.id) != Some(user) {
            debug!("Dropped favorites update for {} (no longer signed in)", user);
            return false;
        }

        match update {
            FavoritesUpdate::Replace(favorites) => state.favorites = favorites,
            FavoritesUpdate::Insert(station) => {
                state.favorites.insert(station);
            }
            FavoritesUpdate::Remove(station) => {
                state.favorites.remove(&station);
            }
        }
        true
    }

    pub(crate) fn set_operation_state(&self, transition: OperationTransition) {
        self.state.write().operations.apply(transition);
    }
}
