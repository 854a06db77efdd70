//! Safezone library entry points.
//!
//! This crate exposes the geographic core of the disaster-alert maps service:
//! decoding Google encoded polylines, great-circle distance and radius
//! filtering, a wrapper around the Google Maps Directions and Places web
//! services, and a TTL cache for their responses. Higher-level consumers (CLI,
//! HTTP service) should only depend on the functions exported here instead of
//! reimplementing behavior.

#![deny(warnings)]

pub mod cache;
pub mod distance;
pub mod error;
pub mod geo;
pub mod maps;
pub mod polyline;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use distance::{distance_between, haversine, path_length, sort_by_distance, within_radius};
pub use error::{Error, PolylineErrorKind, Result};
pub use geo::{GeoPoint, Located, EARTH_RADIUS_METERS};
pub use maps::{
    DirectionsQuery, MapsClient, MapsConfig, NearbyQuery, Route, RouteStep, SafeZone,
    SafeZoneKind, TravelMode, Waypoint,
};
