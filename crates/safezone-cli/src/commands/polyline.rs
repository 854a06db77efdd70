//! Polyline decode/encode command handlers.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use safezone_lib::{polyline, GeoPoint};

use crate::output::{render_path, render_path_json, PathSummary};
use crate::terminal::ColorPalette;

/// Arguments for the decode command.
#[derive(Debug, Clone)]
pub struct DecodeArgs {
    /// Encoded polyline string.
    pub encoded: String,
    /// Output in JSON format.
    pub json: bool,
}

/// Handle the decode subcommand.
pub fn handle_decode<W: Write>(out: &mut W, args: &DecodeArgs, palette: ColorPalette) -> Result<()> {
    let path = polyline::decode(args.encoded.trim())
        .with_context(|| format!("failed to decode polyline {:?}", args.encoded))?;
    debug!(points = path.len(), "decoded polyline");

    let summary = PathSummary::new(path);
    if args.json {
        render_path_json(out, &summary)?;
    } else {
        render_path(out, &summary, palette)?;
    }
    Ok(())
}

/// Handle the encode subcommand.
pub fn handle_encode<W: Write>(out: &mut W, points: &[GeoPoint]) -> Result<()> {
    let encoded = polyline::encode(points).context("cannot encode points")?;
    writeln!(out, "{}", encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_decode_json() {
        let args = DecodeArgs {
            encoded: format!(" {} ", CANONICAL),
            json: true,
        };
        let mut out = Vec::new();
        handle_decode(&mut out, &args, ColorPalette::plain()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["points"], 3);
    }

    #[test]
    fn test_decode_error_has_context() {
        let args = DecodeArgs {
            encoded: "_p~iF~ps|U_".to_string(),
            json: false,
        };
        let mut out = Vec::new();
        let err = handle_decode(&mut out, &args, ColorPalette::plain()).unwrap_err();
        assert!(err.to_string().contains("failed to decode polyline"));
        assert!(format!("{:#}", err).contains("byte"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_canonical() {
        let points = [
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ];
        let mut out = Vec::new();
        handle_encode(&mut out, &points).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", CANONICAL));
    }

    #[test]
    fn test_encode_rejects_nan() {
        let points = [GeoPoint::new(1.0, 1.0), GeoPoint::new(f64::NAN, 0.0)];
        let mut out = Vec::new();
        let err = handle_encode(&mut out, &points).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid coordinate"));
        assert!(out.is_empty());
    }
}
