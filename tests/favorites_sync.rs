//! Favorite toggling through the synchronizer

mod common;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};

use bikesee::app::{
    AuthMode, Controller, Credentials, Endpoint, FavoriteSynchronizer, Method, SessionStore,
    StationId, ToggleOutcome, User, UserId,
};
use bikesee::errors::GatewayError;

use common::{controller_with, favorites_endpoint, user, ScriptedGateway};

fn favorite(station: &str) -> Endpoint {
    Endpoint::Favorite {
        user: UserId::from("7"),
        station: StationId::from(station),
    }
}

async fn signed_in(
    gateway: &Arc<ScriptedGateway>,
    initial: Value,
) -> (Arc<SessionStore>, Arc<Controller>, Arc<FavoriteSynchronizer>, User) {
    let (store, controller) = controller_with(gateway);
    gateway.respond(Method::Post, Endpoint::Login, Ok(user(7)));
    gateway.respond(Method::Get, favorites_endpoint("7"), Ok(initial));
    let user = controller
        .authenticate(
            &Credentials::new("Ada", "ada@example.com", "hunter2"),
            AuthMode::Login,
        )
        .await
        .unwrap();
    let synchronizer = Arc::new(FavoriteSynchronizer::new(Arc::clone(&controller)));
    (store, controller, synchronizer, user)
}

#[tokio::test]
async fn toggle_twice_restores_the_original_set() {
    let gateway = ScriptedGateway::new();
    let (store, _controller, synchronizer, user) = signed_in(&gateway, json!(["x"])).await;
    gateway.respond(Method::Post, favorite("s"), Ok(Value::Null));
    gateway.respond(Method::Delete, favorite("s"), Ok(json!({ "deleted": true })));
    let before = store.favorites();

    let station = StationId::from("s");
    assert_eq!(
        synchronizer.toggle(&station, Some(&user)).await,
        ToggleOutcome::Added
    );
    assert!(store.is_favorite(&station));
    assert_eq!(
        synchronizer.toggle(&station, Some(&user)).await,
        ToggleOutcome::Removed
    );

    assert_eq!(store.favorites(), before);
}

#[tokio::test]
async fn rapid_double_toggle_dispatches_once() {
    let gateway = ScriptedGateway::new();
    let (store, _controller, synchronizer, user) = signed_in(&gateway, json!([])).await;
    gateway.respond(Method::Post, favorite("s"), Ok(Value::Null));
    let gate = gateway.hold(Method::Post, favorite("s"));
    let station = StationId::from("s");

    let first = {
        let synchronizer = Arc::clone(&synchronizer);
        let user = user.clone();
        let station = station.clone();
        tokio::spawn(async move { synchronizer.toggle(&station, Some(&user)).await })
    };
    gateway.wait_for_call(Method::Post, &favorite("s")).await;

    let second = synchronizer.toggle(&station, Some(&user)).await;
    gate.notify_one();
    let first = first.await.unwrap();

    assert_eq!(first, ToggleOutcome::Added);
    assert_eq!(second, ToggleOutcome::InFlight);
    assert_eq!(gateway.call_count(Method::Post, &favorite("s")), 1);
    assert_eq!(gateway.call_count(Method::Delete, &favorite("s")), 0);
    assert!(store.is_favorite(&station));
}

#[tokio::test]
async fn toggles_on_different_stations_run_concurrently() {
    let gateway = ScriptedGateway::new();
    let (store, _controller, synchronizer, user) = signed_in(&gateway, json!(["b"])).await;
    gateway.respond(Method::Post, favorite("a"), Ok(Value::Null));
    gateway.respond(Method::Delete, favorite("b"), Ok(Value::Null));

    let stations = [StationId::from("a"), StationId::from("b")];
    let outcomes = join_all(
        stations
            .iter()
            .map(|station| synchronizer.toggle(station, Some(&user))),
    )
    .await;

    assert_eq!(outcomes, vec![ToggleOutcome::Added, ToggleOutcome::Removed]);
    let ids: Vec<String> = store.favorites().iter().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[tokio::test]
async fn failed_remove_keeps_the_favorite() {
    let gateway = ScriptedGateway::new();
    let (store, _controller, synchronizer, user) = signed_in(&gateway, json!(["s"])).await;
    gateway.respond(
        Method::Delete,
        favorite("s"),
        Err(GatewayError::Http5xx { status: 503 }),
    );

    let outcome = synchronizer.toggle(&StationId::from("s"), Some(&user)).await;

    match outcome {
        ToggleOutcome::Failed(failure) => assert_eq!(failure.message, "Error removing favorite."),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(store.is_favorite(&StationId::from("s")));
    assert!(!store.operation_state().loading);
}

#[tokio::test]
async fn anonymous_toggle_is_a_no_op() {
    let gateway = ScriptedGateway::new();
    let (store, controller) = controller_with(&gateway);
    let synchronizer = FavoriteSynchronizer::new(controller);

    let outcome = synchronizer.toggle_current(&StationId::from("s")).await;

    assert_eq!(outcome, ToggleOutcome::Anonymous);
    assert_eq!(gateway.total_calls(), 0);
    assert!(store.operation_state().error.is_none());
}

#[tokio::test]
async fn response_after_sign_out_is_discarded() {
    let gateway = ScriptedGateway::new();
    let (store, controller, synchronizer, user) = signed_in(&gateway, json!([])).await;
    gateway.respond(Method::Post, favorite("s"), Ok(Value::Null));
    let gate = gateway.hold(Method::Post, favorite("s"));

    let pending = {
        let synchronizer = Arc::clone(&synchronizer);
        tokio::spawn(async move {
            synchronizer
                .toggle(&StationId::from("s"), Some(&user))
                .await
        })
    };
    gateway.wait_for_call(Method::Post, &favorite("s")).await;
    controller.sign_out().await;
    gate.notify_one();

    assert_eq!(pending.await.unwrap(), ToggleOutcome::Discarded);
    assert!(store.favorites().is_empty());
    assert!(store.user().is_none());
}
