//! Distance command handler.

use std::io::Write;

use anyhow::{Context, Result};

use safezone_lib::{distance_between, GeoPoint};

use crate::output::render_distance;

/// Handle the distance subcommand.
pub fn handle_distance<W: Write>(out: &mut W, from: GeoPoint, to: GeoPoint, km: bool) -> Result<()> {
    let meters = distance_between(from, to)
        .with_context(|| format!("cannot measure distance from {} to {}", from, to))?;
    render_distance(out, meters, km)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_km() {
        let mut out = Vec::new();
        handle_distance(
            &mut out,
            GeoPoint::new(37.7749, -122.4194),
            GeoPoint::new(34.0522, -118.2437),
            true,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let km: f64 = text.trim().trim_end_matches(" km").parse().unwrap();
        assert!((km - 559.0).abs() < 2.0, "got {} km", km);
    }

    #[test]
    fn test_distance_rejects_invalid_point() {
        let mut out = Vec::new();
        let err = handle_distance(
            &mut out,
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(100.0, 0.0),
            false,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid coordinate"));
    }
}
