//! Application state for the HTTP maps service.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the Google Maps client, the browser configuration, and the response
//! caches.

use std::sync::Arc;

use safezone_lib::{MapsClient, Route, SafeZone, TtlCache};

use crate::config::{BrowserMapsConfig, ServiceConfig};

/// Error during application state initialization.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    /// Failed to build the Google Maps client.
    #[error("failed to create maps client: {0}")]
    MapsClient(#[from] safezone_lib::Error),

    /// The cache TTL does not fit in a chrono duration.
    #[error("cache TTL of {0} seconds is out of range")]
    CacheTtl(u64),
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use safezone_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let client = state.maps();
///     // ... call the Directions API
/// }
///
/// let state = AppState::new(ServiceConfig::from_env()?)?;
/// let app = Router::new()
///     .route("/api/v1/directions", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    maps: MapsClient,
    browser: BrowserMapsConfig,
    directions_cache: TtlCache<String, Vec<Route>>,
    safe_zones_cache: TtlCache<String, Vec<SafeZone>>,
}

impl AppState {
    /// Build application state from configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, AppStateError> {
        let ttl_secs = config.cache_ttl.as_secs();
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(AppStateError::CacheTtl(ttl_secs))?;

        tracing::info!(
            base_url = %config.maps.base_url,
            cache_ttl_secs = ttl_secs,
            cache_max_entries = config.cache_max_entries,
            "creating maps client"
        );
        let maps = MapsClient::new(config.maps)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                maps,
                browser: config.browser,
                directions_cache: TtlCache::new(ttl).with_max_entries(config.cache_max_entries),
                safe_zones_cache: TtlCache::new(ttl).with_max_entries(config.cache_max_entries),
            }),
        })
    }

    /// Access the Google Maps client.
    pub fn maps(&self) -> &MapsClient {
        &self.inner.maps
    }

    /// Settings served to the browser map.
    pub fn browser_config(&self) -> &BrowserMapsConfig {
        &self.inner.browser
    }

    /// Cache of reshaped Directions responses, keyed by `DirectionsQuery::cache_key`.
    pub fn directions_cache(&self) -> &TtlCache<String, Vec<Route>> {
        &self.inner.directions_cache
    }

    /// Cache of reshaped nearby-search responses, keyed by `NearbyQuery::cache_key`.
    pub fn safe_zones_cache(&self) -> &TtlCache<String, Vec<SafeZone>> {
        &self.inner.safe_zones_cache
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("maps_base_url", &self.inner.maps.base_url())
            .field("directions_cached", &self.inner.directions_cache.len())
            .field("safe_zones_cached", &self.inner.safe_zones_cache.len())
            .finish()
    }
}
