//! Prometheus metrics infrastructure for the safezone maps service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for `/metrics` endpoint
//! - Business metric helpers for upstream calls, caching and geometry endpoints
//!
//! # Example
//!
//! ```no_run
//! use safezone_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! // Initialize metrics at startup
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! // Add metrics endpoint to router
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Create configuration through `lookup` instead of the process environment.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = lookup("METRICS_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at application startup before any metrics are recorded.
/// Subsequent calls will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Metrics are disabled in configuration
/// - The recorder has already been installed
/// - The Prometheus builder fails to install
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if [`init_metrics`] has not been called.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    #[error("metrics are disabled")]
    Disabled,
    /// The recorder has already been installed.
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a Google Maps web-service call.
///
/// Increments `safezone_upstream_requests_total` and records the call latency
/// in `safezone_upstream_duration_seconds`.
///
/// * `api` - "directions" or "places"
/// * `outcome` - "ok" or a failure reason from `failure_reason`
pub fn record_upstream_request(api: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "safezone_upstream_requests_total",
        "api" => api.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "safezone_upstream_duration_seconds",
        "api" => api.to_string()
    )
    .record(duration_secs);
}

/// Record a response cache lookup.
///
/// Increments `safezone_cache_hits_total` or `safezone_cache_misses_total`.
pub fn record_cache_lookup(cache: &str, hit: bool) {
    let name = if hit {
        "safezone_cache_hits_total"
    } else {
        "safezone_cache_misses_total"
    };
    metrics::counter!(name, "cache" => cache.to_string()).increment(1);
}

/// Record the routes returned for a directions request.
///
/// Records to the `safezone_route_distance_meters` histogram, one sample per route.
pub fn record_routes_returned(distances_m: impl IntoIterator<Item = u64>, mode: &str) {
    for distance in distances_m {
        metrics::histogram!(
            "safezone_route_distance_meters",
            "mode" => mode.to_string()
        )
        .record(distance as f64);
    }
}

/// Record the number of safe zones returned by a nearby search.
///
/// Records to the `safezone_safe_zones_returned` histogram.
pub fn record_safe_zones_returned(count: usize, kind: &str) {
    metrics::histogram!(
        "safezone_safe_zones_returned",
        "kind" => kind.to_string()
    )
    .record(count as f64);
}

/// Record a polyline decode request.
///
/// Increments `safezone_polylines_decoded_total`; on success also records the
/// number of points to `safezone_polyline_points`.
pub fn record_polyline_decoded(points: Option<usize>) {
    let outcome = if points.is_some() { "ok" } else { "invalid" };
    metrics::counter!("safezone_polylines_decoded_total", "outcome" => outcome).increment(1);
    if let Some(points) = points {
        metrics::histogram!("safezone_polyline_points").record(points as f64);
    }
}
