//! Success envelope for JSON endpoints.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// A successful payload, optionally tagged with the request id that produced
/// it so clients can correlate a body with the `x-request-id` header or with
/// a later problem document.
///
/// The payload's fields sit at the top level of the JSON object.
///
/// ```
/// use safezone_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct DistanceResult {
///     meters: f64,
/// }
///
/// let body = ServiceResponse::new(DistanceResult { meters: 1500.0 }).with_request_id("req-1");
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["meters"], 1500.0);
/// assert_eq!(json["request_id"], "req-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Zones {
        count: usize,
        names: Vec<String>,
    }

    fn zones() -> Zones {
        Zones {
            count: 2,
            names: vec!["General Hospital".to_string(), "Station 9".to_string()],
        }
    }

    #[test]
    fn payload_fields_are_top_level() {
        let json = serde_json::to_value(ServiceResponse::new(zones())).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["names"][1], "Station 9");
        assert!(json.get("data").is_none());
        assert!(json.get("request_id").is_none());
        assert!(json.get("content_type").is_none());
    }

    #[test]
    fn request_id_is_included_when_set() {
        let body = ServiceResponse::new(zones()).with_request_id("0192-abc");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["request_id"], "0192-abc");
    }

    #[test]
    fn deserializes_with_or_without_request_id() {
        let body: ServiceResponse<Zones> =
            serde_json::from_str(r#"{"count":0,"names":[],"request_id":"r"}"#).unwrap();
        assert_eq!(body.request_id.as_deref(), Some("r"));

        let body: ServiceResponse<Zones> =
            serde_json::from_str(r#"{"count":0,"names":[]}"#).unwrap();
        assert!(body.request_id.is_none());
        assert_eq!(body.data.count, 0);
    }
}
