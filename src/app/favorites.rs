//! Favorite toggling
//!
//! A toggle reads the current membership of a station, sends the matching add
//! or remove through the controller, and only touches the local favorite set
//! once the backend acknowledged the change. While a toggle for a station is
//! in flight, further toggles for the same station are rejected instead of
//! queued, so a double click never sends two opposite requests.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::app::controller::Controller;
use crate::app::models::{FavoriteAction, StationId, User};
use crate::app::session::OperationFailure;

/// How a toggle request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nobody is signed in; nothing was sent
    Anonymous,
    /// A toggle for this station is already in flight; nothing was sent
    InFlight,
    Added,
    Removed,
    /// The backend accepted the change but the user signed out meanwhile
    Discarded,
    /// The backend rejected the change; the local set is unchanged
    Failed(OperationFailure),
}

impl ToggleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("sign in to save favorites"),
            Self::InFlight => f.write_str("already updating"),
            Self::Added => f.write_str("added to favorites"),
            Self::Removed => f.write_str("removed from favorites"),
            Self::Discarded => f.write_str("discarded (signed out)"),
            Self::Failed(failure) => write!(f, "{}", failure),
        }
    }
}

/// Serializes favorite toggles per station
pub struct FavoriteSynchronizer {
    controller: Arc<Controller>,
    in_flight: Mutex<HashSet<StationId>>,
}

impl FavoriteSynchronizer {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Flip the favorite status of `station` for `user`
    pub async fn toggle(&self, station: &StationId, user: Option<&User>) -> ToggleOutcome {
        let Some(user) = user else {
            debug!("Ignored favorite toggle of {}: not signed in", station);
            return ToggleOutcome::Anonymous;
        };
        let Some(_slot) = InFlightSlot::claim(&self.in_flight, station) else {
            debug!("Ignored favorite toggle of {}: already in flight", station);
            return ToggleOutcome::InFlight;
        };

        let action = if self.controller.store().is_favorite(station) {
            FavoriteAction::Remove
        } else {
            FavoriteAction::Add
        };

        match self
            .controller
            .toggle_favorite(station, &user.id, action)
            .await
        {
            Ok(true) => match action {
                FavoriteAction::Add => ToggleOutcome::Added,
                FavoriteAction::Remove => ToggleOutcome::Removed,
            },
            Ok(false) => ToggleOutcome::Discarded,
            Err(failure) => ToggleOutcome::Failed(failure),
        }
    }

    /// Toggle on behalf of whoever is currently signed in
    pub async fn toggle_current(&self, station: &StationId) -> ToggleOutcome {
        let user = self.controller.store().user();
        self.toggle(station, user.as_ref()).await
    }

    pub fn is_in_flight(&self, station: &StationId) -> bool {
        self.in_flight.lock().contains(station)
    }
}

/// Reservation of one station id, released on drop
struct InFlightSlot<'a> {
    in_flight: &'a Mutex<HashSet<StationId>>,
    station: StationId,
}

impl<'a> InFlightSlot<'a> {
    fn claim(in_flight: &'a Mutex<HashSet<StationId>>, station: &StationId) -> Option<Self> {
        if !in_flight.lock().insert(station.clone()) {
            return None;
        }
        Some(Self {
            in_flight,
            station: station.clone(),
        })
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.station);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::app::client::testing::ScriptedGateway;
    use crate::app::client::{Endpoint, Gateway, Method};
    use crate::app::models::{AuthMode, Credentials, UserId};
    use crate::app::session::SessionStore;
    use crate::errors::GatewayError;

    async fn signed_in() -> (Arc<ScriptedGateway>, Arc<FavoriteSynchronizer>, User) {
        let gateway = ScriptedGateway::new();
        let store = Arc::new(SessionStore::new());
        let controller = Arc::new(Controller::new(
            Arc::clone(&gateway) as Arc<dyn Gateway>,
            store,
        ));
        gateway.respond(
            Method::Post,
            Endpoint::Login,
            Ok(json!({ "id": "u1", "name": "Ada", "email": "ada@example.com" })),
        );
        gateway.respond(
            Method::Get,
            Endpoint::Favorites(UserId::from("u1")),
            Ok(json!(["kept"])),
        );
        let user = controller
            .authenticate(&Credentials::new("Ada", "ada@example.com", "pw"), AuthMode::Login)
            .await
            .unwrap();
        (gateway, Arc::new(FavoriteSynchronizer::new(controller)), user)
    }

    fn favorite(user: &User, station: &str) -> Endpoint {
        Endpoint::Favorite {
            user: user.id.clone(),
            station: StationId::from(station),
        }
    }

    #[tokio::test]
    async fn test_anonymous_toggle_sends_nothing() {
        let gateway = ScriptedGateway::new();
        let controller = Arc::new(Controller::new(
            Arc::clone(&gateway) as Arc<dyn Gateway>,
            Arc::new(SessionStore::new()),
        ));
        let synchronizer = FavoriteSynchronizer::new(Arc::clone(&controller));

        let outcome = synchronizer.toggle(&StationId::from("s1"), None).await;

        assert_eq!(outcome, ToggleOutcome::Anonymous);
        assert!(gateway.calls().is_empty());
        assert!(controller.store().operation_state().error.is_none());
    }

    #[tokio::test]
    async fn test_membership_picks_the_action() {
        let (gateway, synchronizer, user) = signed_in().await;
        gateway.respond(Method::Delete, favorite(&user, "kept"), Ok(Value::Null));
        gateway.respond(Method::Post, favorite(&user, "new"), Ok(Value::Null));

        let removed = synchronizer
            .toggle(&StationId::from("kept"), Some(&user))
            .await;
        let added = synchronizer
            .toggle_current(&StationId::from("new"))
            .await;

        assert_eq!(removed, ToggleOutcome::Removed);
        assert_eq!(added, ToggleOutcome::Added);
        assert!(added.is_applied());
        assert_eq!(gateway.call_count(Method::Delete, &favorite(&user, "kept")), 1);
        assert_eq!(gateway.call_count(Method::Post, &favorite(&user, "new")), 1);
    }

    #[tokio::test]
    async fn test_rapid_double_toggle_sends_one_request() {
        let (gateway, synchronizer, user) = signed_in().await;
        let endpoint = favorite(&user, "s1");
        let gate = gateway.hold(Method::Post, endpoint.clone());
        gateway.respond(Method::Post, endpoint.clone(), Ok(Value::Null));

        let first = {
            let synchronizer = Arc::clone(&synchronizer);
            let user = user.clone();
            tokio::spawn(async move {
                synchronizer
                    .toggle(&StationId::from("s1"), Some(&user))
                    .await
            })
        };
        while gateway.call_count(Method::Post, &endpoint) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(synchronizer.is_in_flight(&StationId::from("s1")));

        let second = synchronizer
            .toggle(&StationId::from("s1"), Some(&user))
            .await;
        assert_eq!(second, ToggleOutcome::InFlight);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), ToggleOutcome::Added);
        assert!(!synchronizer.is_in_flight(&StationId::from("s1")));
        assert_eq!(gateway.call_count(Method::Post, &endpoint), 1);
        assert_eq!(gateway.call_count(Method::Delete, &endpoint), 0);
    }

    #[tokio::test]
    async fn test_failed_toggle_releases_station() {
        let (gateway, synchronizer, user) = signed_in().await;
        let endpoint = favorite(&user, "s1");
        gateway.respond(
            Method::Post,
            endpoint.clone(),
            Err(GatewayError::Http5xx { status: 502 }),
        );
        gateway.respond(Method::Post, endpoint.clone(), Ok(Value::Null));

        let failed = synchronizer
            .toggle(&StationId::from("s1"), Some(&user))
            .await;
        assert!(matches!(failed, ToggleOutcome::Failed(ref f) if f.message == "Error adding favorite."));

        let retried = synchronizer
            .toggle(&StationId::from("s1"), Some(&user))
            .await;
        assert_eq!(retried, ToggleOutcome::Added);
    }
}
