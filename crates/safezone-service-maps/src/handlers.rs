//! Request handlers for the maps service.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use safezone_lib::{
    distance_between, path_length, polyline, GeoPoint, Route, SafeZone, SafeZoneKind, TravelMode,
};
use safezone_service_shared::{
    extract_or_generate_request_id, failure_reason, from_lib_error, record_cache_lookup,
    record_polyline_decoded, record_routes_returned, record_safe_zones_returned,
    record_upstream_request, AppState, BrowserMapsConfig, DecodeRequest, DirectionsRequest,
    DistanceRequest, ProblemDetails, SafeZonesRequest, ServiceResponse, Validate,
};

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug)]
pub(crate) enum ApiResponse<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

impl<T> From<ProblemDetails> for ApiResponse<T> {
    fn from(problem: ProblemDetails) -> Self {
        ApiResponse::Error(problem)
    }
}

/// Unwrap a JSON body and validate it, or produce the problem to return.
fn accept<R: Validate>(
    payload: Result<Json<R>, JsonRejection>,
    request_id: &str,
) -> Result<R, ProblemDetails> {
    let Json(request) = payload.map_err(|rejection| {
        ProblemDetails::bad_request(rejection.body_text(), request_id)
    })?;
    request.validate(request_id).map_err(|problem| *problem)?;
    Ok(request)
}

#[derive(Debug, Serialize)]
pub(crate) struct DirectionsResponse {
    mode: TravelMode,
    /// Served from the response cache.
    cached: bool,
    /// Recommended route first.
    routes: Vec<Route>,
}

/// Handle POST /api/v1/directions requests.
pub(crate) async fn directions(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> ApiResponse<DirectionsResponse> {
    let request_id = extract_or_generate_request_id(&headers).to_string();
    let request = match accept(payload, &request_id) {
        Ok(request) => request,
        Err(problem) => return problem.into(),
    };

    let query = request.to_query();
    info!(
        origin = %query.origin,
        destination = %query.destination,
        mode = %query.mode,
        "handling directions request"
    );

    let key = query.cache_key();
    let cached = state.directions_cache().get(&key);
    record_cache_lookup("directions", cached.is_some());

    let (routes, cached) = match cached {
        Some(routes) => (routes, true),
        None => {
            let started = Instant::now();
            let result = state.maps().directions(&query).await;
            let elapsed = started.elapsed().as_secs_f64();
            match result {
                Ok(routes) => {
                    record_upstream_request("directions", "ok", elapsed);
                    state.directions_cache().insert(key, routes.clone());
                    (routes, false)
                }
                Err(e) => {
                    record_upstream_request("directions", failure_reason(&e), elapsed);
                    warn!(error = %e, "directions lookup failed");
                    return from_lib_error(&e, &request_id).into();
                }
            }
        }
    };

    record_routes_returned(routes.iter().map(|r| r.distance_meters), query.mode.as_str());
    info!(routes = routes.len(), cached, "directions resolved");

    ApiResponse::Success(
        ServiceResponse::new(DirectionsResponse {
            mode: query.mode,
            cached,
            routes,
        })
        .with_request_id(request_id),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct SafeZonesResponse {
    location: GeoPoint,
    radius_m: f64,
    kind: SafeZoneKind,
    cached: bool,
    count: usize,
    /// Nearest first.
    safe_zones: Vec<SafeZone>,
}

/// Handle POST /api/v1/safe-zones requests.
pub(crate) async fn safe_zones(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SafeZonesRequest>, JsonRejection>,
) -> ApiResponse<SafeZonesResponse> {
    let request_id = extract_or_generate_request_id(&headers).to_string();
    let request = match accept(payload, &request_id) {
        Ok(request) => request,
        Err(problem) => return problem.into(),
    };

    let query = request.to_query();
    let key = query.cache_key();
    let cached = state.safe_zones_cache().get(&key);
    record_cache_lookup("safe_zones", cached.is_some());

    let (zones, cached) = match cached {
        Some(zones) => (zones, true),
        None => {
            let started = Instant::now();
            let result = state.maps().nearby_safe_zones(&query).await;
            let elapsed = started.elapsed().as_secs_f64();
            match result {
                Ok(zones) => {
                    record_upstream_request("places", "ok", elapsed);
                    state.safe_zones_cache().insert(key, zones.clone());
                    (zones, false)
                }
                Err(e) => {
                    record_upstream_request("places", failure_reason(&e), elapsed);
                    warn!(error = %e, "safe zone search failed");
                    return from_lib_error(&e, &request_id).into();
                }
            }
        }
    };

    record_safe_zones_returned(zones.len(), query.kind.place_type());
    info!(
        location = %query.location,
        kind = query.kind.place_type(),
        count = zones.len(),
        cached,
        "safe zones resolved"
    );

    ApiResponse::Success(
        ServiceResponse::new(SafeZonesResponse {
            location: query.location,
            radius_m: query.radius_m,
            kind: query.kind,
            cached,
            count: zones.len(),
            safe_zones: zones,
        })
        .with_request_id(request_id),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct DistanceResponse {
    from: GeoPoint,
    to: GeoPoint,
    meters: f64,
    kilometers: f64,
}

/// Handle POST /api/v1/distance requests.
pub(crate) async fn distance(
    headers: HeaderMap,
    payload: Result<Json<DistanceRequest>, JsonRejection>,
) -> ApiResponse<DistanceResponse> {
    let request_id = extract_or_generate_request_id(&headers).to_string();
    let request = match accept(payload, &request_id) {
        Ok(request) => request,
        Err(problem) => return problem.into(),
    };

    match distance_between(request.from, request.to) {
        Ok(meters) => ApiResponse::Success(
            ServiceResponse::new(DistanceResponse {
                from: request.from,
                to: request.to,
                meters,
                kilometers: meters / 1000.0,
            })
            .with_request_id(request_id),
        ),
        Err(e) => from_lib_error(&e, &request_id).into(),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DecodeResponse {
    points: usize,
    /// Along-path length in meters.
    length_meters: f64,
    path: Vec<GeoPoint>,
}

/// Handle POST /api/v1/polyline/decode requests.
pub(crate) async fn decode_polyline(
    headers: HeaderMap,
    payload: Result<Json<DecodeRequest>, JsonRejection>,
) -> ApiResponse<DecodeResponse> {
    let request_id = extract_or_generate_request_id(&headers).to_string();
    let request = match accept(payload, &request_id) {
        Ok(request) => request,
        Err(problem) => return problem.into(),
    };

    match polyline::decode(&request.polyline) {
        Ok(path) => {
            record_polyline_decoded(Some(path.len()));
            ApiResponse::Success(
                ServiceResponse::new(DecodeResponse {
                    points: path.len(),
                    length_meters: path_length(&path),
                    path,
                })
                .with_request_id(request_id),
            )
        }
        Err(e) => {
            record_polyline_decoded(None);
            info!(error = %e, "rejected polyline");
            from_lib_error(&e, &request_id).into()
        }
    }
}

/// Handle GET /api/v1/maps/config requests.
pub(crate) async fn maps_config(
    State(state): State<AppState>,
) -> ApiResponse<BrowserMapsConfig> {
    ApiResponse::Success(ServiceResponse::new(state.browser_config().clone()))
}
