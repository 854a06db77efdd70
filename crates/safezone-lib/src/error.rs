use std::fmt;

use thiserror::Error;

/// Convenient result alias for the safezone library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a latitude/longitude pair is outside the valid range or not finite.
    #[error("invalid coordinate ({lat}, {lng}); latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Raised when a `"lat,lng"` string cannot be parsed.
    #[error("cannot parse coordinate {input:?}; expected \"lat,lng\"")]
    CoordinateFormat { input: String },

    /// Raised when a search radius is negative or not finite.
    #[error("invalid radius {radius} m; radius must be a finite, non-negative number of meters")]
    InvalidRadius { radius: f64 },

    /// Raised when an encoded polyline cannot be decoded.
    #[error("malformed polyline at byte {position}: {reason}")]
    PolylineDecode {
        position: usize,
        reason: PolylineErrorKind,
    },

    /// Raised when the Directions API has no route between the requested points.
    #[error("no route found between {origin} and {destination}")]
    RouteNotFound { origin: String, destination: String },

    /// Raised when an upstream API answers with a non-OK status document.
    #[error("upstream API returned status {status}{}", format_message(.message))]
    UpstreamStatus {
        status: String,
        message: Option<String>,
    },

    /// Raised when an upstream API answers with a non-success HTTP status.
    #[error("upstream API returned HTTP {status}")]
    UpstreamHttp { status: u16 },

    /// Raised when a required configuration value is missing.
    #[error("missing configuration value: {name}")]
    MissingConfig { name: String },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Specific reason a polyline failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolylineErrorKind {
    /// Byte outside the printable range used by the encoding (`'?'..='~'`).
    InvalidCharacter(char),
    /// The stream ended in the middle of a value, or a latitude had no longitude.
    Truncated,
    /// A single value does not fit in a 32-bit delta.
    Overflow,
    /// A decoded point lies outside the valid latitude/longitude range.
    OutOfRange,
}

impl fmt::Display for PolylineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolylineErrorKind::InvalidCharacter(c) => write!(f, "invalid character {:?}", c),
            PolylineErrorKind::Truncated => write!(f, "unexpected end of input"),
            PolylineErrorKind::Overflow => write!(f, "value exceeds 32 bits"),
            PolylineErrorKind::OutOfRange => write!(f, "point outside the valid coordinate range"),
        }
    }
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(": {}", message),
        _ => String::new(),
    }
}
