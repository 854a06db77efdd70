//! Output formatting for decoded paths and distances.
//!
//! Renderers write to any [`Write`] so they can be tested without capturing
//! stdout.

use std::io::{self, Write};

use serde::Serialize;

use safezone_lib::GeoPoint;

use crate::terminal::{format_distance, ColorPalette};

/// A decoded path with its along-path length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSummary {
    pub points: usize,
    pub length_meters: f64,
    pub path: Vec<GeoPoint>,
}

impl PathSummary {
    pub fn new(path: Vec<GeoPoint>) -> Self {
        Self {
            points: path.len(),
            length_meters: safezone_lib::path_length(&path),
            path,
        }
    }
}

/// Render a decoded path as a numbered coordinate table.
pub fn render_path<W: Write>(
    out: &mut W,
    summary: &PathSummary,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "{}{} points{}, {}{}{} along the path",
        p.white_bold,
        summary.points,
        p.reset,
        p.green,
        format_distance(summary.length_meters),
        p.reset
    )?;

    let width = summary.points.to_string().len();
    for (i, point) in summary.path.iter().enumerate() {
        writeln!(
            out,
            "{gray}{idx:>width$}{reset}  {cyan}{lat:>9.5}, {lng:>10.5}{reset}",
            gray = p.gray,
            idx = i + 1,
            width = width,
            reset = p.reset,
            cyan = p.cyan,
            lat = point.lat,
            lng = point.lng,
        )?;
    }
    Ok(())
}

/// Render a path summary as pretty-printed JSON.
pub fn render_path_json<W: Write>(out: &mut W, summary: &PathSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

/// Render a distance, either in meters or kilometres.
pub fn render_distance<W: Write>(out: &mut W, meters: f64, km: bool) -> io::Result<()> {
    if km {
        writeln!(out, "{:.3} km", meters / 1000.0)
    } else {
        writeln!(out, "{:.1} m", meters)
    }
}
