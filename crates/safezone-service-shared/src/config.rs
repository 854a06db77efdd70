//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `GOOGLE_MAPS_API_KEY`: Server-side key for the web services (required)
//! - `GOOGLE_MAPS_BROWSER_KEY`: Key handed to the browser (default: the API key)
//! - `GOOGLE_MAPS_BASE_URL`: Web services endpoint (default: `https://maps.googleapis.com`)
//! - `GOOGLE_MAPS_MAP_ID`: Cloud-styled map id served to the browser (optional)
//! - `MAP_DEFAULT_CENTER`: Initial map center as `lat,lng` (default: `0,0`)
//! - `MAP_DEFAULT_ZOOM`: Initial zoom level (default: 12)
//! - `CACHE_TTL_SECS`: Upstream response cache lifetime, 0 disables (default: 300)
//! - `CACHE_MAX_ENTRIES`: Entries kept per response cache, 0 disables (default: 1000)
//! - `UPSTREAM_TIMEOUT_SECS`: Per-request upstream timeout (default: 10)
//! - `SERVICE_PORT`: HTTP port (default: 8080)

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use safezone_lib::cache::DEFAULT_MAX_ENTRIES;
use safezone_lib::maps::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use safezone_lib::{GeoPoint, MapsConfig};

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings handed to the browser so it can load the Maps JavaScript API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserMapsConfig {
    /// Browser-restricted API key.
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_id: Option<String>,
    pub default_center: GeoPoint,
    pub default_zoom: u8,
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub maps: MapsConfig,
    pub browser: BrowserMapsConfig,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub port: u16,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(|name| vars.get(name).cloned())
    }

    /// Read configuration through `lookup`, so tests need not mutate the
    /// process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("GOOGLE_MAPS_API_KEY").ok_or(ConfigError::MissingVar("GOOGLE_MAPS_API_KEY"))?;
        let browser_key = get("GOOGLE_MAPS_BROWSER_KEY").unwrap_or_else(|| api_key.clone());
        let base_url = get("GOOGLE_MAPS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let map_id = get("GOOGLE_MAPS_MAP_ID");

        let default_center = match get("MAP_DEFAULT_CENTER") {
            Some(value) => value.parse::<GeoPoint>().map_err(|e| ConfigError::InvalidVar {
                name: "MAP_DEFAULT_CENTER",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => GeoPoint::new(0.0, 0.0),
        };
        let default_zoom = parse_var(get("MAP_DEFAULT_ZOOM"), "MAP_DEFAULT_ZOOM", 12u8)?;
        if default_zoom > 22 {
            return Err(ConfigError::InvalidVar {
                name: "MAP_DEFAULT_ZOOM",
                value: default_zoom.to_string(),
                reason: "zoom must be between 0 and 22".to_string(),
            });
        }

        let cache_ttl_secs = parse_var(get("CACHE_TTL_SECS"), "CACHE_TTL_SECS", 300u64)?;
        let cache_max_entries =
            parse_var(get("CACHE_MAX_ENTRIES"), "CACHE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES)?;
        let timeout_secs = parse_var(
            get("UPSTREAM_TIMEOUT_SECS"),
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        )?;
        let port = parse_var(get("SERVICE_PORT"), "SERVICE_PORT", 8080u16)?;

        Ok(Self {
            maps: MapsConfig::new(api_key)
                .with_base_url(base_url)
                .with_timeout(Duration::from_secs(timeout_secs)),
            browser: BrowserMapsConfig {
                api_key: browser_key,
                map_id,
                default_center,
                default_zoom,
            },
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            port,
        })
    }
}

fn parse_var<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
