//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use safezone_lib::maps::places::MAX_SEARCH_RADIUS_METERS;
use safezone_lib::{DirectionsQuery, GeoPoint, NearbyQuery, SafeZoneKind, TravelMode, Waypoint};

use crate::ProblemDetails;

/// Default safe-zone search radius in meters.
pub const DEFAULT_SAFE_ZONE_RADIUS_METERS: f64 = 5_000.0;

/// Longest encoded polyline accepted by the decode endpoint, in bytes.
pub const MAX_POLYLINE_LENGTH: usize = 100_000;

/// Longest free-text waypoint address accepted, in bytes.
pub const MAX_ADDRESS_LENGTH: usize = 512;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn check_point(point: &GeoPoint, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    point
        .validate()
        .map_err(|_| Box::new(ProblemDetails::invalid_coordinate(point.lat, point.lng, request_id)))
}

fn check_waypoint(
    waypoint: &Waypoint,
    field: &str,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    match waypoint {
        Waypoint::Point(point) => check_point(point, request_id),
        Waypoint::Address(address) if address.trim().is_empty() => {
            Err(Box::new(ProblemDetails::bad_request(
                format!("The '{}' field is required and cannot be empty", field),
                request_id,
            )))
        }
        Waypoint::Address(address) if address.len() > MAX_ADDRESS_LENGTH => {
            Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The '{}' field cannot exceed {} bytes",
                    field, MAX_ADDRESS_LENGTH
                ),
                request_id,
            )))
        }
        Waypoint::Address(_) => Ok(()),
    }
}

/// Request for directions between two waypoints.
///
/// Waypoints are either `{"lat": .., "lng": ..}` objects or address strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,

    /// Travel mode, driving when omitted.
    #[serde(default)]
    pub mode: TravelMode,

    /// Also return alternative routes.
    #[serde(default)]
    pub alternatives: bool,
}

impl DirectionsRequest {
    pub fn to_query(&self) -> DirectionsQuery {
        DirectionsQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            mode: self.mode,
            alternatives: self.alternatives,
        }
    }
}

impl Validate for DirectionsRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_waypoint(&self.origin, "origin", request_id)?;
        check_waypoint(&self.destination, "destination", request_id)
    }
}

/// Request for safe zones around a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeZonesRequest {
    pub location: GeoPoint,

    /// Search radius in meters.
    #[serde(default = "default_radius")]
    pub radius_m: f64,

    #[serde(default)]
    pub kind: SafeZoneKind,
}

fn default_radius() -> f64 {
    DEFAULT_SAFE_ZONE_RADIUS_METERS
}

impl SafeZonesRequest {
    pub fn to_query(&self) -> NearbyQuery {
        NearbyQuery::new(self.location, self.radius_m, self.kind)
    }
}

impl Validate for SafeZonesRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_point(&self.location, request_id)?;

        if !self.radius_m.is_finite() || self.radius_m < 1.0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'radius_m' field must be at least 1 meter",
                request_id,
            )));
        }

        if self.radius_m > MAX_SEARCH_RADIUS_METERS {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'radius_m' field cannot exceed {} meters",
                    MAX_SEARCH_RADIUS_METERS
                ),
                request_id,
            )));
        }

        Ok(())
    }
}

/// Request for the great-circle distance between two points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl Validate for DistanceRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_point(&self.from, request_id)?;
        check_point(&self.to, request_id)
    }
}

/// Request to decode an encoded polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeRequest {
    /// Encoded path. An empty string decodes to an empty path.
    pub polyline: String,
}

impl Validate for DecodeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.polyline.len() > MAX_POLYLINE_LENGTH {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'polyline' field cannot exceed {} bytes",
                    MAX_POLYLINE_LENGTH
                ),
                request_id,
            )));
        }
        Ok(())
    }
}
