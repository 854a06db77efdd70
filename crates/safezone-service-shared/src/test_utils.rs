//! Test utilities for microservice handler testing.
//!
//! This module provides an [`AppState`] wired to an arbitrary base URL and a
//! local fake of the Google Maps web services, so handler tests never leave
//! the loopback interface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use safezone_lib::{GeoPoint, MapsConfig};

use crate::config::{BrowserMapsConfig, ServiceConfig};
use crate::state::AppState;

/// Server-side key used by test state.
pub const TEST_API_KEY: &str = "test-server-key";

/// Browser key served by `/api/v1/maps/config` in tests.
pub const TEST_BROWSER_KEY: &str = "test-browser-key";

/// Cache lifetime used by test state.
pub const TEST_CACHE_TTL: Duration = Duration::from_secs(60);

/// Build service configuration pointing at `base_url`.
pub fn test_config(base_url: &str) -> ServiceConfig {
    ServiceConfig {
        maps: MapsConfig::new(TEST_API_KEY)
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(2)),
        browser: BrowserMapsConfig {
            api_key: TEST_BROWSER_KEY.to_string(),
            map_id: Some("test-map".to_string()),
            default_center: GeoPoint::new(37.7749, -122.4194),
            default_zoom: 13,
        },
        cache_ttl: TEST_CACHE_TTL,
        cache_max_entries: 64,
        port: 0,
    }
}

/// Build an `AppState` whose maps client talks to `base_url`.
///
/// # Panics
///
/// Panics if the state cannot be built. This indicates a test
/// configuration issue.
pub fn test_state(base_url: &str) -> AppState {
    AppState::new(test_config(base_url))
        .unwrap_or_else(|e| panic!("failed to build test state for {}: {}", base_url, e))
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

/// Canned Google Maps responses served from a local axum server.
///
/// Endpoints without a canned body answer 404. Every upstream call is
/// counted so tests can assert on cache behavior.
#[derive(Clone, Default)]
pub struct FakeMaps {
    directions: Option<(StatusCode, Value)>,
    places: Option<(StatusCode, Value)>,
    calls: Arc<AtomicUsize>,
}

impl FakeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directions(mut self, body: Value) -> Self {
        self.directions = Some((StatusCode::OK, body));
        self
    }

    pub fn with_places(mut self, body: Value) -> Self {
        self.places = Some((StatusCode::OK, body));
        self
    }

    /// Answer every endpoint with a bare HTTP error.
    pub fn failing_with(mut self, status: StatusCode) -> Self {
        self.directions = Some((status, Value::Null));
        self.places = Some((status, Value::Null));
        self
    }

    /// Number of upstream requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Serve on an ephemeral loopback port and return the base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/maps/api/directions/json", get(fake_directions))
            .route("/maps/api/place/nearbysearch/json", get(fake_places))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind fake upstream: {}", e));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("fake upstream has no address: {}", e));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{}", addr)
    }
}

async fn fake_directions(State(fake): State<FakeMaps>) -> Response {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    canned(fake.directions)
}

async fn fake_places(State(fake): State<FakeMaps>) -> Response {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    canned(fake.places)
}

fn canned(response: Option<(StatusCode, Value)>) -> Response {
    match response {
        Some((status, body)) if status.is_success() => (status, Json(body)).into_response(),
        Some((status, _)) => (status, "fake upstream failure").into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Directions document with one route along the well-known three-point path.
pub fn sample_directions() -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "summary": "I-5 N",
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
            "warnings": ["Walking directions are in beta."],
            "legs": [{
                "distance": { "text": "1,038 km", "value": 1_038_000 },
                "duration": { "text": "10 hours", "value": 36_000 },
                "start_address": "Shelter A",
                "end_address": "Clinic B",
                "start_location": { "lat": 38.5, "lng": -120.2 },
                "end_location": { "lat": 43.252, "lng": -126.453 },
                "steps": [{
                    "html_instructions": "Head <b>north</b>",
                    "distance": { "text": "1,038 km", "value": 1_038_000 },
                    "duration": { "text": "10 hours", "value": 36_000 },
                    "polyline": { "points": "_p~iF~ps|U_ulLnnqC" }
                }]
            }]
        }]
    })
}

/// Nearby-search document around San Francisco City Hall: two hospitals
/// inside 5 km (the farther one listed first) and one about 60 km away.
pub fn sample_places() -> Value {
    json!({
        "status": "OK",
        "results": [
            {
                "place_id": "far-general",
                "name": "Far General",
                "vicinity": "Mission District",
                "geometry": { "location": { "lat": 37.7599, "lng": -122.4148 } },
                "opening_hours": { "open_now": true },
                "rating": 4.1
            },
            {
                "place_id": "near-clinic",
                "name": "Civic Center Clinic",
                "vicinity": "Civic Center",
                "geometry": { "location": { "lat": 37.7793, "lng": -122.4193 } }
            },
            {
                "place_id": "out-of-range",
                "name": "San Jose Regional",
                "geometry": { "location": { "lat": 37.3382, "lng": -121.8863 } }
            }
        ]
    })
}
