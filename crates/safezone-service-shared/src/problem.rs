//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use safezone_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for coordinates outside the valid latitude/longitude range.
pub const PROBLEM_INVALID_COORDINATE: &str = "/problems/invalid-coordinate";

/// Problem type URI for encoded polylines that cannot be decoded.
pub const PROBLEM_INVALID_POLYLINE: &str = "/problems/invalid-polyline";

/// Problem type URI for routes that cannot be found.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for failures reported by the Google Maps web services.
pub const PROBLEM_UPSTREAM_ERROR: &str = "/problems/upstream-error";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all service endpoints.
///
/// # Example
///
/// ```
/// use safezone_service_shared::{ProblemDetails, PROBLEM_ROUTE_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_ROUTE_NOT_FOUND,
///     "Route Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("No route exists from 'Shelter A' to 'Island Clinic'")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem for out-of-range coordinates.
    pub fn invalid_coordinate(lat: f64, lng: f64, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_COORDINATE,
            "Invalid Coordinate",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(format!(
            "Coordinate ({}, {}) is outside latitude [-90, 90] / longitude [-180, 180]",
            lat, lng
        ))
        .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem for an undecodable polyline.
    pub fn invalid_polyline(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_POLYLINE,
            "Invalid Polyline",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for unreachable routes.
    pub fn route_not_found(origin: &str, destination: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!(
            "No route exists from '{}' to '{}'",
            origin, destination
        ))
        .with_request_id(request_id)
    }

    /// Create a 502 Bad Gateway problem for upstream API failures.
    pub fn upstream_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_ERROR,
            "Upstream Error",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Set the content-type header to application/problem+json
        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
/// Transport errors are reported without their URL, which would carry the API key.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidCoordinate { lat, lng } => {
            ProblemDetails::invalid_coordinate(*lat, *lng, request_id)
        }
        LibError::CoordinateFormat { .. } | LibError::InvalidRadius { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::PolylineDecode { .. } => {
            ProblemDetails::invalid_polyline(error.to_string(), request_id)
        }
        LibError::RouteNotFound {
            origin,
            destination,
        } => ProblemDetails::route_not_found(origin, destination, request_id),
        LibError::UpstreamStatus { .. } | LibError::UpstreamHttp { .. } => {
            ProblemDetails::upstream_error(error.to_string(), request_id)
        }
        LibError::Http(e) if e.is_timeout() => {
            ProblemDetails::upstream_error("Google Maps request timed out", request_id)
        }
        LibError::Http(_) | LibError::Json(_) => {
            ProblemDetails::upstream_error("Google Maps request failed", request_id)
        }
        LibError::MissingConfig { .. } => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

/// Short label for metrics describing why a library call failed.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::InvalidCoordinate { .. }
        | LibError::CoordinateFormat { .. }
        | LibError::InvalidRadius { .. } => "validation_error",
        LibError::PolylineDecode { .. } => "invalid_polyline",
        LibError::RouteNotFound { .. } => "no_route",
        LibError::UpstreamStatus { .. } => "upstream_status",
        LibError::UpstreamHttp { .. } | LibError::Http(_) | LibError::Json(_) => "upstream_http",
        LibError::MissingConfig { .. } => "internal_error",
    }
}
