//! Text formatting for score tree rendering: indentation, display casing and
//! severity colorization.
//!
//! The renderer never emits escape codes itself. It tags text with a [`Band`]
//! through the [`BandFormatter`] seam; [`ColoredFormatter`] maps bands to
//! terminal colors, [`PlainFormatter`] passes text through untouched.

mod band;

pub use band::Band;

use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;

/// Marker placed in front of every nested node.
pub const BRANCH_MARKER: &str = "└── ";

/// Spaces added per nesting level beyond the first.
pub const INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

impl From<bool> for ColorMode {
    fn from(colorized: bool) -> Self {
        if colorized {
            Self::Always
        } else {
            Self::Never
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingConfig {
    #[serde(default)]
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// Create a plain output configuration (no colors)
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }
}

/// Emphasis capability the renderer invokes.
///
/// Implementations decide how a band is displayed; the renderer only decides
/// which band applies.
pub trait BandFormatter {
    /// Tag `text` with the emphasis of `band`.
    fn band(&self, text: &str, band: Band) -> String;

    /// De-emphasize `text` (used for leaf lines).
    fn dim(&self, text: &str) -> String;
}

/// ANSI escape sequence ending a styled span.
const RESET: &str = "\x1b[0m";

/// SGR code for faint text.
const DIM_CODE: &str = "2";

/// Terminal colors through ANSI escapes.
///
/// Escapes are written directly from the `colored` color codes, so whether a
/// render is colored depends only on the formatter's own configuration and
/// never on (or changes) `colored`'s process-wide switch.
pub struct ColoredFormatter {
    enabled: bool,
}

impl ColoredFormatter {
    /// Colors are resolved once: `Auto` checks the terminal here.
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            enabled: config.color.should_use_color(),
        }
    }

    pub fn always() -> Self {
        Self::new(FormattingConfig::new(ColorMode::Always))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }

        let start = format!("\x1b[{}m", code);
        // Inner spans end with a reset; the outer style resumes after each one
        let body = text.replace(RESET, &format!("{}{}", RESET, start));
        format!("{}{}{}", start, body, RESET)
    }
}

impl BandFormatter for ColoredFormatter {
    fn band(&self, text: &str, band: Band) -> String {
        self.paint(text, &band.color().to_fg_str())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, DIM_CODE)
    }
}

pub struct PlainFormatter;

impl BandFormatter for PlainFormatter {
    fn band(&self, text: &str, _band: Band) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Generate the indentation prefix for a nesting depth.
///
/// Depth 0 has no prefix, depth 1 is the bare branch marker, deeper levels
/// shift the marker right by `INDENT_WIDTH` spaces per extra level.
///
/// ```
/// use scoretree::formatting::indent;
///
/// assert_eq!(indent(0), "");
/// assert_eq!(indent(1), "└── ");
/// assert_eq!(indent(3), "        └── ");
/// ```
pub fn indent(depth: usize) -> String {
    match depth {
        0 => String::new(),
        _ => format!("{}{}", " ".repeat(INDENT_WIDTH * (depth - 1)), BRANCH_MARKER),
    }
}

/// Tag `text` with the band of `score`.
///
/// The score is clamped to [0, 1] before classification.
pub fn colorize(text: &str, score: f64, formatter: &dyn BandFormatter) -> String {
    formatter.band(text, Band::from_score(score.clamp(0.0, 1.0)))
}

/// Display casing for node names.
///
/// The first letter of every run of cased letters is upper-cased and the
/// rest lower-cased; anything else (digits, punctuation, uncased scripts
/// such as CJK) starts a new run.
///
/// ```
/// use scoretree::formatting::title_case;
///
/// assert_eq!(title_case("top speed (m/s)"), "Top Speed (M/S)");
/// assert_eq!(title_case("Battery consumption (kWh)"), "Battery Consumption (Kwh)");
/// ```
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_cased = false;

    for c in text.chars() {
        if previous_is_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_cased = c.is_lowercase() || c.is_uppercase();
    }

    result
}

/// Percentage with two decimals, e.g. `0.5` → `50.00%`.
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
