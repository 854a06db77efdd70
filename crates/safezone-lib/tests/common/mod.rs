//! Common test utilities: a local stand-in for the Google Maps web services.
//!
//! Each test spawns its own axum server on an ephemeral port and points a
//! `MapsClient` at it, so tests run in parallel without touching the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use safezone_lib::{MapsClient, MapsConfig};

pub const TEST_API_KEY: &str = "test-key";

/// Canned upstream behavior plus a log of the query strings it received.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    pub directions: Option<(StatusCode, Value)>,
    pub places: Option<(StatusCode, Value)>,
    pub requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

#[allow(dead_code)]
impl FakeUpstream {
    pub fn with_directions(mut self, body: Value) -> Self {
        self.directions = Some((StatusCode::OK, body));
        self
    }

    pub fn with_places(mut self, body: Value) -> Self {
        self.places = Some((StatusCode::OK, body));
        self
    }

    pub fn failing_with(mut self, status: StatusCode) -> Self {
        self.directions = Some((status, Value::Null));
        self.places = Some((status, Value::Null));
        self
    }

    pub fn recorded(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }
}

async fn directions(
    State(fake): State<FakeUpstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.requests.lock().unwrap().push(params);
    respond(fake.directions)
}

async fn places(
    State(fake): State<FakeUpstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.requests.lock().unwrap().push(params);
    respond(fake.places)
}

fn respond(canned: Option<(StatusCode, Value)>) -> Response {
    match canned {
        Some((status, body)) if status == StatusCode::OK => Json(body).into_response(),
        Some((status, _)) => (status, "upstream failure").into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Spawn the fake upstream and return a client wired to it.
pub async fn spawn(fake: FakeUpstream) -> MapsClient {
    let app = Router::new()
        .route("/maps/api/directions/json", get(directions))
        .route("/maps/api/place/nearbysearch/json", get(places))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });

    let config = MapsConfig::new(TEST_API_KEY).with_base_url(format!("http://{}", addr));
    MapsClient::new(config).expect("client builds")
}
