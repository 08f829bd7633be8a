//! Async lifecycle controller
//!
//! The controller runs the named operations of a session. Each operation
//! marks itself in flight, runs its gateway steps in order, records the first
//! failure into the store and commits its result as the final step. Failures
//! never propagate as faults: they land in [`OperationState`] and are also
//! handed back to the caller as an [`OperationFailure`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bikesee::app::{ApiConfig, ClientConfig, Controller, HttpGateway, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new(&ClientConfig::default(), ApiConfig::default())?;
//! let store = Arc::new(SessionStore::new());
//! let controller = Controller::new(Arc::new(gateway), Arc::clone(&store));
//!
//! if controller.load_catalog().await.is_ok() {
//!     println!("{} networks", store.catalog().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`OperationState`]: crate::app::session::OperationState

mod guard;


use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::client::{BikeApi, Gateway};
use crate::app::geo::Coordinate;
use crate::app::models::{
    AuthMode, Credentials, FavoriteAction, FavoriteSet, NetworkId, StationId, User, UserId,
};
use crate::app::resolver::{resolve_network, NetworkTracker};
use crate::app::session::{
    FavoritesUpdate, OperationFailure, OperationKind, SessionCache, SessionStore,
};
use crate::errors::LocationResult;

use guard::OperationGuard;

/// Result of a named operation; the failure is also recorded in the store
pub type OperationResult<T> = std::result::Result<T, OperationFailure>;

/// What [`Controller::locate`] did for one coordinate sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateOutcome {
    /// Nearest network to the sample
    pub network: NetworkId,
    /// Whether the nearest network differs from the previous sample's
    pub changed: bool,
    /// Whether fresh stations were committed to the store
    pub committed: bool,
}

/// Runs named operations against the gateway and commits into the store
pub struct Controller {
    api: BikeApi,
    store: Arc<SessionStore>,
    tracker: NetworkTracker,
    cache: Option<SessionCache>,
}

impl Controller {
    pub fn new(gateway: Arc<dyn Gateway>, store: Arc<SessionStore>) -> Self {
        Self {
            api: BikeApi::new(gateway),
            store,
            tracker: NetworkTracker::new(),
            cache: None,
        }
    }

    /// Persist the signed-in user to `cache` across runs
    pub fn with_session_cache(mut self, cache: SessionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn tracker(&self) -> &NetworkTracker {
        &self.tracker
    }

    /// Fetch the network catalog and replace the stored one
    pub async fn load_catalog(&self) -> OperationResult<usize> {
        let guard = OperationGuard::start(&self.store, OperationKind::LoadCatalog);
        let networks = self.api.networks().await.map_err(|e| guard.fail(&e))?;

        let count = networks.len();
        self.store.set_catalog(networks);
        info!("Loaded {} networks", count);
        Ok(count)
    }

    /// Fetch and commit the stations of `network`, unconditionally
    pub async fn load_stations(&self, network: &NetworkId) -> OperationResult<usize> {
        let guard = OperationGuard::start(&self.store, OperationKind::LoadStations);
        let stations = self
            .api
            .stations(network)
            .await
            .map_err(|e| guard.fail(&e))?;

        let count = stations.len();
        self.store.set_stations(network.clone(), stations);
        info!("Loaded {} stations for {}", count, network);
        Ok(count)
    }

    /// Sign in or sign up, then load the user's favorites
    ///
    /// The user is committed as soon as the auth call succeeds. If the
    /// favorites step then fails, the user stays signed in with an empty
    /// favorite set and the recorded error describes the favorites failure.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        mode: AuthMode,
    ) -> OperationResult<User> {
        let kind = match mode {
            AuthMode::Login => OperationKind::Login,
            AuthMode::Signup => OperationKind::Signup,
        };
        // Held across both steps so loading stays set until favorites settle
        let guard = OperationGuard::start(&self.store, kind);

        let user = self
            .api
            .authenticate(credentials, mode)
            .await
            .map_err(|e| guard.fail(&e))?;
        self.store.set_user(user.clone());
        info!("Signed in as {} ({})", user.name, user.id);
        self.remember(&user).await;

        self.load_favorites(&user.id).await?;
        Ok(user)
    }

    /// Replace the favorite set with the remote copy for `user`
    pub async fn load_favorites(&self, user: &UserId) -> OperationResult<FavoriteSet> {
        let guard = OperationGuard::start(&self.store, OperationKind::LoadFavorites);
        let favorites = self.api.favorites(user).await.map_err(|e| guard.fail(&e))?;

        if self
            .store
            .set_favorites(user, FavoritesUpdate::Replace(favorites.clone()))
        {
            info!("Loaded {} favorites for {}", favorites.len(), user);
        } else {
            warn!("Discarded favorites for {}: user is no longer signed in", user);
        }
        Ok(favorites)
    }

    /// Add or remove one favorite remotely, then locally
    ///
    /// Returns whether the local set was updated; `false` means the request
    /// succeeded but `user` signed out in the meantime.
    pub async fn toggle_favorite(
        &self,
        station: &StationId,
        user: &UserId,
        action: FavoriteAction,
    ) -> OperationResult<bool> {
        let (kind, update) = match action {
            FavoriteAction::Add => (
                OperationKind::AddFavorite,
                FavoritesUpdate::Insert(station.clone()),
            ),
            FavoriteAction::Remove => (
                OperationKind::RemoveFavorite,
                FavoritesUpdate::Remove(station.clone()),
            ),
        };
        let guard = OperationGuard::start(&self.store, kind);

        let request = match action {
            FavoriteAction::Add => self.api.add_favorite(user, station).await,
            FavoriteAction::Remove => self.api.remove_favorite(user, station).await,
        };
        request.map_err(|e| guard.fail(&e))?;

        let committed = self.store.set_favorites(user, update);
        if committed {
            debug!("Favorite {} {} for {}", action, station, user);
        } else {
            warn!(
                "Discarded favorite {} of {}: user {} is no longer signed in",
                action, station, user
            );
        }
        Ok(committed)
    }

    /// Resolve the nearest network to `point` and load its stations on change
    ///
    /// Stations are only fetched when the nearest network differs from the
    /// previous sample, and only committed if no newer network was resolved
    /// while the fetch was in flight. A failed fetch is recorded in the store
    /// and forgotten by the tracker so the next sample retries it.
    ///
    /// # Errors
    ///
    /// Returns `LocationError` if `point` is invalid or no catalog is loaded.
    pub async fn locate(&self, point: Coordinate) -> LocationResult<LocateOutcome> {
        let catalog = self.store.catalog();
        let network = resolve_network(point, &catalog)?.id.clone();

        if !self.tracker.observe(&network) {
            debug!("Nearest network unchanged ({})", network);
            return Ok(LocateOutcome {
                network,
                changed: false,
                committed: false,
            });
        }
        info!("Nearest network is now {}", network);

        let guard = OperationGuard::start(&self.store, OperationKind::LoadStations);
        let committed = match self.api.stations(&network).await {
            Ok(stations) => {
                let count = stations.len();
                let committed = self.tracker.commit_if_current(&network, || {
                    self.store.set_stations(network.clone(), stations);
                });
                if committed {
                    info!("Loaded {} stations for {}", count, network);
                } else {
                    warn!("Discarded stale stations for {}", network);
                }
                committed
            }
            Err(e) => {
                guard.fail(&e);
                self.tracker.forget(&network);
                false
            }
        };
        drop(guard);

        Ok(LocateOutcome {
            network,
            changed: true,
            committed,
        })
    }

    /// Sign out and forget the cached user
    pub async fn sign_out(&self) {
        if let Some(user) = self.store.user() {
            info!("Signing out {}", user.id);
        }
        self.store.clear_session();
        self.tracker.reset();

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear().await {
                warn!("Failed to clear cached session: {}", e);
            }
        }
    }

    /// Sign the cached user back in and refresh their favorites
    ///
    /// Returns the restored user, or `None` when nothing usable is cached.
    /// A favorites failure is recorded in the store; the user stays signed in.
    pub async fn restore_session(&self) -> Option<User> {
        let cache = self.cache.as_ref()?;
        let user = match cache.load().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("No cached session at {}", cache.path().display());
                return None;
            }
            Err(e) => {
                warn!("Ignoring cached session: {}", e);
                return None;
            }
        };

        self.store.set_user(user.clone());
        info!("Restored session for {} ({})", user.name, user.id);
        let _ = self.load_favorites(&user.id).await;
        Some(user)
    }

    async fn remember(&self, user: &User) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(user).await {
                warn!("Failed to cache session: {}", e);
            }
        }
    }
}
