/// Display text used when a run carries no usable status.
pub const UNKNOWN: &str = "Unknown";

/// Map a raw status value to its display text.
///
/// Returns [`UNKNOWN`] when `raw` is absent, blank after trimming, or the
/// literal text `null` in any casing. Any other value is returned unchanged
/// (surrounding whitespace included).
pub fn classify(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !is_placeholder(s) => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn is_placeholder(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null")
}

/// Colour family a display status is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Failed,
    Warning,
    Cancelled,
    Neutral,
}

impl StatusTone {
    /// Single-character marker used in the recent-runs strip.
    pub const fn glyph(self) -> char {
        match self {
            Self::Success => '+',
            Self::Failed => 'x',
            Self::Warning => '!',
            Self::Cancelled => '-',
            Self::Neutral => '?',
        }
    }
}

/// Classify display text into a [`StatusTone`] (case-insensitive).
///
/// `Completed` shares the success tone and `Error` shares the failed tone;
/// anything unrecognised, including [`UNKNOWN`], is neutral.
pub fn tone(display: &str) -> StatusTone {
    match display.to_ascii_lowercase().as_str() {
        "success" | "completed" => StatusTone::Success,
        "failed" | "error" => StatusTone::Failed,
        "warning" => StatusTone::Warning,
        "cancelled" => StatusTone::Cancelled,
        _ => StatusTone::Neutral,
    }
}
