//! Places nearby-search for safe zones (hospitals, police, fire stations, pharmacies).

use serde::{Deserialize, Serialize};

use crate::distance::{check_radius, haversine, sort_by_distance, within_radius};
use crate::error::{Error, Result};
use crate::geo::{GeoPoint, Located};

/// Largest radius the nearby-search endpoint accepts, in meters.
pub const MAX_SEARCH_RADIUS_METERS: f64 = 50_000.0;

/// Kind of facility to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeZoneKind {
    #[default]
    Hospital,
    Police,
    FireStation,
    Pharmacy,
}

impl SafeZoneKind {
    /// Places API `type` filter value.
    pub fn place_type(self) -> &'static str {
        match self {
            SafeZoneKind::Hospital => "hospital",
            SafeZoneKind::Police => "police",
            SafeZoneKind::FireStation => "fire_station",
            SafeZoneKind::Pharmacy => "pharmacy",
        }
    }
}

/// A nearby-search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub location: GeoPoint,
    pub radius_m: f64,
    #[serde(default)]
    pub kind: SafeZoneKind,
}

impl NearbyQuery {
    pub fn new(location: GeoPoint, radius_m: f64, kind: SafeZoneKind) -> Self {
        Self {
            location,
            radius_m,
            kind,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        check_radius(self.radius_m)?;
        if self.radius_m > MAX_SEARCH_RADIUS_METERS {
            return Err(Error::InvalidRadius {
                radius: self.radius_m,
            });
        }
        Ok(())
    }

    /// Query parameters, excluding the API key.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("location", self.location.to_query_value()),
            ("radius", format!("{}", self.radius_m.round() as u64)),
            ("type", self.kind.place_type().to_string()),
        ]
    }

    /// Stable key for caching responses. Cached distances and the radius
    /// filter are relative to the exact center and radius, so both are keyed
    /// at full precision.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.location.to_query_value(),
            self.radius_m,
            self.kind.place_type()
        )
    }
}

// Upstream document, only the fields we reshape.

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: RawGeometry,
    #[serde(default)]
    pub opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}

/// A facility people can head to during an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub place_id: String,
    pub name: String,
    pub kind: SafeZoneKind,
    pub address: Option<String>,
    pub location: GeoPoint,
    /// Great-circle distance from the search center.
    pub distance_meters: f64,
    pub open_now: Option<bool>,
    pub rating: Option<f64>,
}

impl Located for SafeZone {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Reshape a nearby-search document into safe zones within the query radius,
/// nearest first.
///
/// `ZERO_RESULTS` is an empty list, not an error. Any other non-`OK` status
/// becomes [`Error::UpstreamStatus`]. Places the API returns outside the radius
/// (it treats the radius as a bias) are dropped.
pub fn parse_places(body: &PlacesResponse, query: &NearbyQuery) -> Result<Vec<SafeZone>> {
    match body.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Ok(Vec::new()),
        _ => {
            return Err(Error::UpstreamStatus {
                status: body.status.clone(),
                message: body.error_message.clone(),
            })
        }
    }

    let center = query.location;
    let zones = body.results.iter().map(|place| SafeZone {
        place_id: place.place_id.clone(),
        name: place.name.clone(),
        kind: query.kind,
        address: place.vicinity.clone(),
        location: place.geometry.location,
        distance_meters: haversine(center, place.geometry.location),
        open_now: place.opening_hours.as_ref().and_then(|hours| hours.open_now),
        rating: place.rating,
    });

    let mut zones = within_radius(center, zones, query.radius_m)?;
    sort_by_distance(center, &mut zones);
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint::new(37.7749, -122.4194);

    fn place(id: &str, lat: f64, lng: f64) -> serde_json::Value {
        serde_json::json!({
            "place_id": id,
            "name": format!("Place {}", id),
            "vicinity": "Somewhere",
            "geometry": { "location": { "lat": lat, "lng": lng } },
            "opening_hours": { "open_now": true },
            "rating": 4.5
        })
    }

    #[test]
    fn sorted_nearest_first_and_filtered() {
        let body: PlacesResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "results": [
                place("far", 37.80, -122.45),
                place("near", 37.7755, -122.4190),
                place("outside", 38.50, -121.50)
            ]
        }))
        .unwrap();

        let query = NearbyQuery::new(CENTER, 10_000.0, SafeZoneKind::Hospital);
        let zones = parse_places(&body, &query).unwrap();

        let ids: Vec<_> = zones.iter().map(|z| z.place_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(zones[0].distance_meters < zones[1].distance_meters);
        assert_eq!(zones[0].open_now, Some(true));
        assert_eq!(zones[0].kind, SafeZoneKind::Hospital);
        assert_eq!(zones[0].address.as_deref(), Some("Somewhere"));
    }

    #[test]
    fn larger_radius_is_superset() {
        let body: PlacesResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "results": [
                place("a", 37.7755, -122.4190),
                place("b", 37.80, -122.45),
                place("c", 38.50, -121.50)
            ]
        }))
        .unwrap();

        let small = parse_places(&body, &NearbyQuery::new(CENTER, 1_000.0, SafeZoneKind::Police))
            .unwrap();
        let large = parse_places(&body, &NearbyQuery::new(CENTER, 50_000.0, SafeZoneKind::Police))
            .unwrap();
        assert!(small.len() <= large.len());
        for zone in &small {
            assert!(large.iter().any(|z| z.place_id == zone.place_id));
        }
    }

    #[test]
    fn zero_results_is_empty() {
        let body: PlacesResponse =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","results":[]}"#).unwrap();
        let query = NearbyQuery::new(CENTER, 1_000.0, SafeZoneKind::Pharmacy);
        assert!(parse_places(&body, &query).unwrap().is_empty());
    }

    #[test]
    fn over_query_limit_is_upstream_status() {
        let body: PlacesResponse =
            serde_json::from_str(r#"{"status":"OVER_QUERY_LIMIT","results":[]}"#).unwrap();
        let query = NearbyQuery::new(CENTER, 1_000.0, SafeZoneKind::Hospital);
        assert!(matches!(
            parse_places(&body, &query),
            Err(Error::UpstreamStatus { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_queries() {
        assert!(NearbyQuery::new(CENTER, 5_000.0, SafeZoneKind::Hospital)
            .validate()
            .is_ok());
        assert!(NearbyQuery::new(CENTER, 60_000.0, SafeZoneKind::Hospital)
            .validate()
            .is_err());
        assert!(NearbyQuery::new(CENTER, -1.0, SafeZoneKind::Hospital)
            .validate()
            .is_err());
        assert!(NearbyQuery::new(GeoPoint::new(100.0, 0.0), 5.0, SafeZoneKind::Hospital)
            .validate()
            .is_err());
    }

    #[test]
    fn params_and_cache_key() {
        let query = NearbyQuery::new(GeoPoint::new(1.234567, -2.5), 1500.4, SafeZoneKind::FireStation);
        let params = query.to_params();
        assert!(params.contains(&("location", "1.234567,-2.5".to_string())));
        assert!(params.contains(&("radius", "1500".to_string())));
        assert!(params.contains(&("type", "fire_station".to_string())));
        assert_eq!(query.cache_key(), "1.234567,-2.5|1500.4|fire_station");
    }

    #[test]
    fn nearby_centers_do_not_share_a_cache_entry() {
        let a = NearbyQuery::new(GeoPoint::new(37.779301, -122.4193), 5000.0, SafeZoneKind::Hospital);
        let b = NearbyQuery::new(GeoPoint::new(37.779304, -122.4193), 5000.0, SafeZoneKind::Hospital);
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), a.clone().cache_key());
    }
}
