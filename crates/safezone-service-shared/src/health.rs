//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator, "ok" when healthy.
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Google Maps endpoint the service proxies to (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,

    /// Live entries in the directions cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_directions: Option<usize>,

    /// Live entries in the safe-zones cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_safe_zones: Option<usize>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            upstream: None,
            cached_directions: None,
            cached_safe_zones: None,
        }
    }

    /// Create a ready status with upstream and cache information.
    pub fn ready(
        service: &str,
        version: &str,
        upstream: &str,
        cached_directions: usize,
        cached_safe_zones: usize,
    ) -> Self {
        Self {
            upstream: Some(upstream.to_string()),
            cached_directions: Some(cached_directions),
            cached_safe_zones: Some(cached_safe_zones),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running. This is a simple check that does
/// not depend on external resources.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"safezone-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Google Maps is not probed; a probe per readiness check would burn quota.
/// Expired cache entries are purged so the reported sizes are live entries.
///
/// ```text
/// GET /health/ready
/// {"status":"ok",...,"upstream":"https://maps.googleapis.com","cached_directions":3,"cached_safe_zones":0}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let directions = state.directions_cache();
    let safe_zones = state.safe_zones_cache();
    directions.purge_expired();
    safe_zones.purge_expired();

    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.maps().base_url(),
        directions.len(),
        safe_zones.len(),
    );
    (StatusCode::OK, Json(status))
}
