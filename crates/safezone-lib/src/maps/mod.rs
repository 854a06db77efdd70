//! Google Maps web-service wrapper.
//!
//! This module provides:
//! - [`MapsClient`] - Async client for the Directions and Places APIs
//! - [`MapsConfig`] - API key, base URL and timeout for the client
//! - [`directions`] - Directions request/response types and reshaping into [`Route`]s
//! - [`places`] - Nearby search request/response types and reshaping into [`SafeZone`]s
//!
//! Fetching and reshaping are split: [`directions::parse_directions`] and
//! [`places::parse_places`] are pure functions over the upstream JSON
//! documents, and the client only adds the HTTP round trip. Upstream errors
//! pass straight through; there are no retries.
//!
//! # Example
//!
//! ```ignore
//! use safezone_lib::maps::{DirectionsQuery, MapsClient, MapsConfig};
//!
//! let client = MapsClient::new(MapsConfig::new("api-key"))?;
//! let routes = client.directions(&DirectionsQuery::driving(origin, destination)).await?;
//! println!("{} m", routes[0].distance_meters);
//! ```

pub mod directions;
pub mod places;

pub use directions::{
    parse_directions, DirectionsQuery, DirectionsResponse, Route, RouteStep, TravelMode, Waypoint,
};
pub use places::{parse_places, NearbyQuery, PlacesResponse, SafeZone, SafeZoneKind};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Production endpoint of the Google Maps web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default per-request timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Connection settings for [`MapsClient`].
#[derive(Clone)]
pub struct MapsConfig {
    /// Server-side API key sent with every request.
    pub api_key: String,
    /// Scheme and host of the web services, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Async client for the Directions and Places web services.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: Client,
    config: MapsConfig,
}

impl MapsClient {
    /// Build a client. Fails if the API key is empty or the HTTP client
    /// cannot be constructed.
    pub fn new(config: MapsConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingConfig {
                name: "Google Maps API key".to_string(),
            });
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch driving/walking/cycling/transit directions and reshape every
    /// returned route, decoding its polylines.
    pub async fn directions(&self, query: &DirectionsQuery) -> Result<Vec<Route>> {
        let params = query.to_params();
        let body: DirectionsResponse = self.get_json(DIRECTIONS_PATH, &params).await?;
        parse_directions(&body, query)
    }

    /// Search for safe zones (hospitals, police, ...) around a point, nearest first.
    pub async fn nearby_safe_zones(&self, query: &NearbyQuery) -> Result<Vec<SafeZone>> {
        query.validate()?;
        let params = query.to_params();
        let body: PlacesResponse = self.get_json(NEARBY_SEARCH_PATH, &params).await?;
        parse_places(&body, query)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(endpoint = path, "calling Google Maps web service");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = path, status = status.as_u16(), "upstream HTTP error");
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Http(e.without_url()))
    }
}
