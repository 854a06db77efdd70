//! Directions API request building and response reshaping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::polyline;

/// Travel mode understood by the Directions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route endpoint: either coordinates or a free-text address the API geocodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waypoint {
    Point(GeoPoint),
    Address(String),
}

impl Waypoint {
    /// Value for the `origin` / `destination` query parameters.
    pub fn to_query_value(&self) -> String {
        match self {
            Waypoint::Point(point) => point.to_query_value(),
            Waypoint::Address(address) => address.trim().to_string(),
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Point(point) => write!(f, "{}", point),
            Waypoint::Address(address) => f.write_str(address.trim()),
        }
    }
}

impl From<GeoPoint> for Waypoint {
    fn from(point: GeoPoint) -> Self {
        Waypoint::Point(point)
    }
}

/// A Directions API request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsQuery {
    pub origin: Waypoint,
    pub destination: Waypoint,
    #[serde(default)]
    pub mode: TravelMode,
    /// Ask the API for alternative routes in addition to the recommended one.
    #[serde(default)]
    pub alternatives: bool,
}

impl DirectionsQuery {
    pub fn driving(origin: impl Into<Waypoint>, destination: impl Into<Waypoint>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            mode: TravelMode::Driving,
            alternatives: false,
        }
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Query parameters, excluding the API key.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("origin", self.origin.to_query_value()),
            ("destination", self.destination.to_query_value()),
            ("mode", self.mode.as_str().to_string()),
        ];
        if self.alternatives {
            params.push(("alternatives", "true".to_string()));
        }
        params
    }

    /// Stable key for caching responses to identical queries.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.origin.to_query_value(),
            self.destination.to_query_value(),
            self.mode,
            self.alternatives
        )
    }
}

// Upstream document, only the fields we reshape.

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub summary: String,
    pub overview_polyline: RawPolyline,
    #[serde(default)]
    pub legs: Vec<RawLeg>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLeg {
    #[serde(default)]
    pub distance: Option<RawValue>,
    #[serde(default)]
    pub duration: Option<RawValue>,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
    pub start_location: GeoPoint,
    pub end_location: GeoPoint,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub html_instructions: String,
    #[serde(default)]
    pub distance: Option<RawValue>,
    #[serde(default)]
    pub duration: Option<RawValue>,
    pub polyline: RawPolyline,
}

/// `{ "text": "5.2 km", "value": 5213 }`
#[derive(Debug, Clone, Deserialize)]
pub struct RawValue {
    pub value: u64,
}

// Reshaped output.

/// One routable path between the query's origin and destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: String,
    /// Sum of all leg distances.
    pub distance_meters: u64,
    /// Sum of all leg durations.
    pub duration_seconds: u64,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    pub start_location: GeoPoint,
    pub end_location: GeoPoint,
    /// Decoded overview polyline, ready to draw.
    pub path: Vec<GeoPoint>,
    pub steps: Vec<RouteStep>,
    pub warnings: Vec<String>,
}

/// A single maneuver within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text with HTML markup removed.
    pub instruction: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub path: Vec<GeoPoint>,
}

/// Reshape a Directions API document into routes.
///
/// `ZERO_RESULTS` and `NOT_FOUND` become [`Error::RouteNotFound`]; any other
/// non-`OK` status becomes [`Error::UpstreamStatus`]. Malformed polylines fail
/// the whole document rather than yielding partial geometry.
pub fn parse_directions(body: &DirectionsResponse, query: &DirectionsQuery) -> Result<Vec<Route>> {
    match body.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => {
            return Err(Error::RouteNotFound {
                origin: query.origin.to_string(),
                destination: query.destination.to_string(),
            })
        }
        _ => {
            return Err(Error::UpstreamStatus {
                status: body.status.clone(),
                message: body.error_message.clone(),
            })
        }
    }

    if body.routes.is_empty() {
        return Err(Error::RouteNotFound {
            origin: query.origin.to_string(),
            destination: query.destination.to_string(),
        });
    }

    body.routes.iter().map(reshape_route).collect()
}

fn reshape_route(raw: &RawRoute) -> Result<Route> {
    let path = polyline::decode(&raw.overview_polyline.points)?;

    let first_leg = raw.legs.first();
    let last_leg = raw.legs.last();
    let start_location = first_leg
        .map(|leg| leg.start_location)
        .or_else(|| path.first().copied())
        .unwrap_or(GeoPoint::new(0.0, 0.0));
    let end_location = last_leg
        .map(|leg| leg.end_location)
        .or_else(|| path.last().copied())
        .unwrap_or(start_location);

    let mut steps = Vec::new();
    for leg in &raw.legs {
        for step in &leg.steps {
            steps.push(RouteStep {
                instruction: strip_html(&step.html_instructions),
                distance_meters: value_of(&step.distance),
                duration_seconds: value_of(&step.duration),
                path: polyline::decode(&step.polyline.points)?,
            });
        }
    }

    Ok(Route {
        summary: raw.summary.clone(),
        distance_meters: raw.legs.iter().map(|leg| value_of(&leg.distance)).sum(),
        duration_seconds: raw.legs.iter().map(|leg| value_of(&leg.duration)).sum(),
        start_address: first_leg.and_then(|leg| leg.start_address.clone()),
        end_address: last_leg.and_then(|leg| leg.end_address.clone()),
        start_location,
        end_location,
        path,
        steps,
        warnings: raw.warnings.clone(),
    })
}

fn value_of(value: &Option<RawValue>) -> u64 {
    value.as_ref().map(|v| v.value).unwrap_or(0)
}

/// Remove tags from `html_instructions` and collapse the whitespace left behind.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> DirectionsQuery {
        DirectionsQuery::driving(GeoPoint::new(38.5, -120.2), GeoPoint::new(43.252, -126.453))
    }

    fn ok_document() -> DirectionsResponse {
        serde_json::from_value(serde_json::json!({
            "status": "OK",
            "routes": [{
                "summary": "I-5 N",
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
                "warnings": ["Use caution"],
                "legs": [{
                    "distance": { "text": "800 km", "value": 800000 },
                    "duration": { "text": "8 hours", "value": 28800 },
                    "start_address": "Start St",
                    "end_address": "End Ave",
                    "start_location": { "lat": 38.5, "lng": -120.2 },
                    "end_location": { "lat": 43.252, "lng": -126.453 },
                    "steps": [
                        {
                            "html_instructions": "Head <b>north</b> on <div style=\"x\">Main&nbsp;St</div>",
                            "distance": { "text": "1 km", "value": 1000 },
                            "duration": { "text": "1 min", "value": 60 },
                            "polyline": { "points": "_p~iF~ps|U" }
                        },
                        {
                            "html_instructions": "Arrive",
                            "polyline": { "points": "" }
                        }
                    ]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn reshapes_ok_document() {
        let routes = parse_directions(&ok_document(), &query()).unwrap();
        assert_eq!(routes.len(), 1);

        let route = &routes[0];
        assert_eq!(route.summary, "I-5 N");
        assert_eq!(route.distance_meters, 800_000);
        assert_eq!(route.duration_seconds, 28_800);
        assert_eq!(route.path.len(), 3);
        assert_eq!(route.path[2], GeoPoint::new(43.252, -126.453));
        assert_eq!(route.start_address.as_deref(), Some("Start St"));
        assert_eq!(route.end_location, GeoPoint::new(43.252, -126.453));
        assert_eq!(route.warnings, vec!["Use caution".to_string()]);

        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].instruction, "Head north on Main St");
        assert_eq!(route.steps[0].path, vec![GeoPoint::new(38.5, -120.2)]);
        assert_eq!(route.steps[1].distance_meters, 0);
        assert!(route.steps[1].path.is_empty());
    }

    #[test]
    fn zero_results_is_route_not_found() {
        let body: DirectionsResponse =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","routes":[]}"#).unwrap();
        let err = parse_directions(&body, &query()).unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { .. }));
    }

    #[test]
    fn denied_is_upstream_status() {
        let body: DirectionsResponse = serde_json::from_str(
            r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid.","routes":[]}"#,
        )
        .unwrap();
        match parse_directions(&body, &query()).unwrap_err() {
            Error::UpstreamStatus { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_overview_polyline_fails() {
        let mut body = ok_document();
        body.routes[0].overview_polyline.points = "_p~iF".to_string();
        let err = parse_directions(&body, &query()).unwrap_err();
        assert!(matches!(err, Error::PolylineDecode { .. }));
    }

    #[test]
    fn query_params_and_cache_key() {
        let q = DirectionsQuery {
            origin: Waypoint::Address(" 1 Infinite Loop ".to_string()),
            destination: Waypoint::Point(GeoPoint::new(1.5, -2.25)),
            mode: TravelMode::Walking,
            alternatives: true,
        };
        let params = q.to_params();
        assert!(params.contains(&("origin", "1 Infinite Loop".to_string())));
        assert!(params.contains(&("destination", "1.5,-2.25".to_string())));
        assert!(params.contains(&("mode", "walking".to_string())));
        assert!(params.contains(&("alternatives", "true".to_string())));
        assert_eq!(q.cache_key(), "1 Infinite Loop|1.5,-2.25|walking|true");
    }

    #[test]
    fn waypoint_deserializes_point_or_address() {
        let point: Waypoint = serde_json::from_str(r#"{"lat":1.0,"lng":2.0}"#).unwrap();
        assert_eq!(point, Waypoint::Point(GeoPoint::new(1.0, 2.0)));
        let address: Waypoint = serde_json::from_str(r#""City Hospital""#).unwrap();
        assert_eq!(address, Waypoint::Address("City Hospital".to_string()));
    }

    #[test]
    fn strip_html_handles_plain_text() {
        assert_eq!(strip_html("Turn left"), "Turn left");
        assert_eq!(strip_html("<b>A</b>&amp;<i>B</i>"), "A & B");
    }
}
