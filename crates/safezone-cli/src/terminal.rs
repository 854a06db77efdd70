//! Terminal styling and number formatting.
//!
//! ANSI colors are only emitted when the terminal supports them; see
//! [`supports_color`].

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for headline values.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for indices and units.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for coordinates.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for distances.
    pub const GREEN: &str = "\x1b[32m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
        }
    }

    /// Palette for the current process environment.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color(|name| std::env::var(name).ok()) {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

/// Check whether ANSI color codes should be used.
///
/// Respects `NO_COLOR` (<https://no-color.org/>) and `TERM=dumb`.
#[must_use]
pub fn supports_color<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("NO_COLOR").is_some() {
        return false;
    }
    !matches!(lookup("TERM"), Some(term) if term.eq_ignore_ascii_case("dumb"))
}

/// Format a number with thousand separators (commas).
///
/// ```
/// # use safezone_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Human-readable distance: whole meters below 10 km, kilometres above.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 10_000.0 {
        format!("{} m", format_with_separators(meters.round() as u64))
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
