//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;

use bikesee::app::{Controller, Endpoint, Gateway, Method, SessionStore, UserId};
use bikesee::errors::{GatewayError, GatewayResult};

type Key = (Method, Endpoint);

/// In-memory gateway answering from per-endpoint queues
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<HashMap<Key, VecDeque<GatewayResult<Value>>>>,
    calls: Mutex<Vec<Key>>,
    gates: Mutex<HashMap<Key, Arc<Notify>>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, endpoint: Endpoint, response: GatewayResult<Value>) {
        self.responses
            .lock()
            .entry((method, endpoint))
            .or_default()
            .push_back(response);
    }

    /// Park calls to `endpoint` until the returned gate is notified
    pub fn hold(&self, method: Method, endpoint: Endpoint) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert((method, endpoint), Arc::clone(&gate));
        gate
    }

    pub fn call_count(&self, method: Method, endpoint: &Endpoint) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(m, e)| *m == method && e == endpoint)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub async fn wait_for_call(&self, method: Method, endpoint: &Endpoint) {
        while self.call_count(method, endpoint) == 0 {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn call(
        &self,
        method: Method,
        endpoint: &Endpoint,
        _body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let key = (method, endpoint.clone());
        self.calls.lock().push(key.clone());

        let gate = self.gates.lock().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Err(GatewayError::Http4xx { status: 404 }))
    }
}

pub fn controller_with(gateway: &Arc<ScriptedGateway>) -> (Arc<SessionStore>, Arc<Controller>) {
    let store = Arc::new(SessionStore::new());
    let controller = Arc::new(Controller::new(
        Arc::clone(gateway) as Arc<dyn Gateway>,
        Arc::clone(&store),
    ));
    (store, controller)
}

pub fn catalog() -> Value {
    json!({
        "networks": [
            {
                "id": "nyc",
                "name": "Citi Bike",
                "company": "Lyft",
                "location": { "latitude": 40.7, "longitude": -74.0, "city": "New York", "country": "US" }
            },
            {
                "id": "sf",
                "name": "Bay Wheels",
                "location": { "latitude": 37.8, "longitude": -122.4, "city": "San Francisco", "country": "US" }
            }
        ]
    })
}

pub fn stations(ids: &[&str]) -> Value {
    let stations: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(n, id)| {
            json!({
                "id": id,
                "name": format!("Station {}", id),
                "latitude": 40.70 + n as f64 * 0.01,
                "longitude": -74.0,
                "free_bikes": n,
                "empty_slots": 10 - n,
                "timestamp": "2024-05-01T12:00:00.000000Z"
            })
        })
        .collect();
    json!({ "network": { "id": "nyc", "stations": stations } })
}

pub fn user(id: i64) -> Value {
    json!({ "id": id, "name": "Ada", "email": "ada@example.com" })
}

pub fn favorites_endpoint(id: &str) -> Endpoint {
    Endpoint::Favorites(UserId::from(id))
}
