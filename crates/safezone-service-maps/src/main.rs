//! Safezone maps HTTP service.
//!
//! Proxies the Google Directions and Places web services for the
//! disaster-alert web client, keeping the server-side API key off the
//! browser, and exposes the polyline and distance helpers of `safezone-lib`.
//!
//! # Endpoints
//!
//! - `POST /api/v1/directions` - Routes between two waypoints, paths decoded
//! - `POST /api/v1/safe-zones` - Nearby hospitals, police, fire stations or pharmacies
//! - `POST /api/v1/distance` - Great-circle distance between two points
//! - `POST /api/v1/polyline/decode` - Decode an encoded polyline
//! - `GET /api/v1/maps/config` - Browser key, map id and initial viewport
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! See `safezone_service_shared::ServiceConfig` for the Google Maps variables, plus:
//!
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus exporter (default: on, `/metrics`)

mod handlers;

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use safezone_service_shared::{
    health_live, health_ready, init_logging, init_metrics, metrics_handler, AppState,
    LoggingConfig, MetricsConfig, MetricsError, MetricsLayer, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("safezone-maps");
    init_logging(&logging_config)?;

    let metrics_config = MetricsConfig::from_env();
    match init_metrics(&metrics_config) {
        Ok(()) => info!(path = %metrics_config.path, "metrics enabled"),
        Err(MetricsError::Disabled) => info!("metrics disabled"),
        // Metrics are optional; keep serving without them.
        Err(e) => warn!(error = %e, "failed to initialize metrics, continuing without metrics"),
    }

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;
    let port = config.port;

    info!(
        port = port,
        base_url = %config.maps.base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting maps service"
    );

    let state = AppState::new(config).map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;

    let app = router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router around `state`.
pub(crate) fn router(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/api/v1/directions", post(handlers::directions))
        .route("/api/v1/safe-zones", post(handlers::safe_zones))
        .route("/api/v1/distance", post(handlers::distance))
        .route("/api/v1/polyline/decode", post(handlers::decode_polyline))
        .route("/api/v1/maps/config", get(handlers::maps_config))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        // The browser client is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
