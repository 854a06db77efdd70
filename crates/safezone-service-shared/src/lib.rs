//! Shared infrastructure for the safezone HTTP maps service.
//!
//! This crate provides the HTTP glue around `safezone-lib`:
//!
//! - [`AppState`]: Google Maps client plus response caches, shared by all handlers
//! - [`ServiceConfig`]: Environment-driven configuration
//! - [`health`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: Success envelope carrying the request id
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; geometry and Google Maps reshaping live in
//! `safezone-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Consult the TTL cache                                    │
//! │  - Call safezone-lib APIs                                   │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a fake Google Maps upstream and state
//! wired to it. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{BrowserMapsConfig, ConfigError, ServiceConfig};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_cache_lookup, record_polyline_decoded,
    record_routes_returned, record_safe_zones_returned, record_upstream_request, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_COORDINATE, PROBLEM_INVALID_POLYLINE, PROBLEM_INVALID_REQUEST,
    PROBLEM_ROUTE_NOT_FOUND, PROBLEM_UPSTREAM_ERROR,
};
pub use request::{
    DecodeRequest, DirectionsRequest, DistanceRequest, SafeZonesRequest, Validate,
    DEFAULT_SAFE_ZONE_RADIUS_METERS, MAX_ADDRESS_LENGTH, MAX_POLYLINE_LENGTH,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
