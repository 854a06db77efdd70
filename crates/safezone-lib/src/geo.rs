//! Geographic primitives shared by the polyline, distance, and maps modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in meters. All distances in this crate are expressed in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point without range checks.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a point, rejecting values outside `[-90, 90]` x `[-180, 180]`.
    pub fn validated(lat: f64, lng: f64) -> Result<Self> {
        let point = Self::new(lat, lng);
        point.validate()?;
        Ok(point)
    }

    /// Check the point lies within the valid latitude/longitude ranges.
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Format as the `"lat,lng"` form accepted by the Google Maps web services.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

impl FromStr for GeoPoint {
    type Err = Error;

    /// Parse `"lat,lng"` (whitespace around either number is ignored) and validate it.
    fn from_str(s: &str) -> Result<Self> {
        let format_err = || Error::CoordinateFormat {
            input: s.to_string(),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(format_err)?;
        let lat: f64 = lat.trim().parse().map_err(|_| format_err())?;
        let lng: f64 = lng.trim().parse().map_err(|_| format_err())?;
        GeoPoint::validated(lat, lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Anything with a geographic position, so distance helpers can work on
/// domain types (safe zones, route endpoints) as well as bare points.
pub trait Located {
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl<T: Located> Located for &T {
    fn location(&self) -> GeoPoint {
        (*self).location()
    }
}
