//! Refresh-history normalization.
//!
//! Each dataflow stores its run history as a string field holding JSON. The
//! upstream service is inconsistent about it: the payload may be missing,
//! malformed, double-encoded (a JSON string whose contents are the real
//! document), and the run objects use either `camelCase` or `PascalCase`
//! keys. Everything here degrades to an empty or partial history instead of
//! failing.

pub mod time;

use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;

use crate::status;

const TIME_KEYS: [&str; 2] = ["startTime", "StartTime"];
const STATUS_KEYS: [&str; 2] = ["status", "Status"];

/// Number of runs shown in the recent-runs strip.
pub const SUMMARY_LEN: usize = 5;

/// One refresh run. At least one of the fields is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub time: Option<String>,
    pub status: Option<String>,
}

impl HistoryEntry {
    /// Milliseconds since the epoch, or `i64::MIN` when the time is missing
    /// or cannot be parsed so that such runs sort last.
    pub fn sort_key(&self) -> i64 {
        self.time
            .as_deref()
            .and_then(time::parse)
            .map_or(i64::MIN, |t| t.timestamp_millis())
    }

    fn from_value(item: &Value) -> Self {
        Self {
            time: first_time(item),
            status: first_text(item, &STATUS_KEYS),
        }
    }

    const fn is_empty(&self) -> bool {
        self.time.is_none() && self.status.is_none()
    }
}

/// First key in `keys` holding a non-empty string.
fn first_text(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First usable start time. Besides text, a non-zero number is read as
/// epoch milliseconds and rendered as RFC 3339.
fn first_time(item: &Value) -> Option<String> {
    TIME_KEYS.iter().find_map(|k| match item.get(k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .filter(|&ms| ms != 0)
            .and_then(DateTime::from_timestamp_millis)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        _ => None,
    })
}

/// Why a raw history payload could not be turned into a run list.
#[derive(Debug)]
pub enum HistoryParseError {
    /// The payload is not JSON.
    Json(serde_json::Error),
    /// The payload is a JSON string whose contents are not JSON.
    NestedJson(serde_json::Error),
    /// The payload parsed, but is not an array of runs.
    NotAnArray,
}

impl fmt::Display for HistoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "history is not valid JSON: {e}"),
            Self::NestedJson(e) => write!(f, "double-encoded history is not valid JSON: {e}"),
            Self::NotAnArray => write!(f, "history is not a JSON array"),
        }
    }
}

impl std::error::Error for HistoryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) | Self::NestedJson(e) => Some(e),
            Self::NotAnArray => None,
        }
    }
}

/// Parse a raw history payload, reporting why it was rejected.
///
/// A top-level JSON string is decoded exactly once more; deeper nesting is
/// not unwrapped. The returned runs are sorted most recent first.
///
/// # Errors
///
/// Returns a [`HistoryParseError`] if the payload (or its decoded inner
/// string) is not JSON, or if the result is not an array.
pub fn try_parse(raw: &str) -> Result<Vec<HistoryEntry>, HistoryParseError> {
    let mut value: Value = serde_json::from_str(raw).map_err(HistoryParseError::Json)?;
    if let Value::String(inner) = &value {
        value = serde_json::from_str(inner).map_err(HistoryParseError::NestedJson)?;
    }
    let Value::Array(items) = value else {
        return Err(HistoryParseError::NotAnArray);
    };

    let mut entries: Vec<HistoryEntry> = items
        .iter()
        .map(HistoryEntry::from_value)
        .filter(|e| !e.is_empty())
        .collect();
    // sort_by_key is stable: runs sharing a time keep their payload order.
    entries.sort_by_key(|e| Reverse(e.sort_key()));
    Ok(entries)
}

/// Normalize a raw history payload into runs, most recent first.
///
/// Missing or empty input yields an empty list. Any parse failure also
/// yields an empty list.
pub fn normalize(raw: Option<&str>) -> Vec<HistoryEntry> {
    normalize_for("<unnamed>", raw)
}

/// Like [`normalize`], naming `record` in the diagnostic logged on failure.
pub fn normalize_for(record: &str, raw: Option<&str>) -> Vec<HistoryEntry> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match try_parse(raw) {
        Ok(entries) => entries,
        Err(HistoryParseError::NotAnArray) => {
            tracing::debug!(dataflow = record, "refresh history is not an array, ignoring");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(dataflow = record, "failed to parse refresh history: {e}");
            Vec::new()
        }
    }
}

/// One-line run summary attached to each listed dataflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Display status of the most recent run.
    pub last_status: Option<String>,
    /// Raw start time of the most recent run.
    pub last_time: Option<String>,
    /// Display statuses of up to [`SUMMARY_LEN`] recent runs, oldest first.
    pub recent: Vec<String>,
}

impl RunSummary {
    /// Derive the summary from runs sorted most recent first.
    pub fn from_history(history: &[HistoryEntry]) -> Self {
        let Some(latest) = history.first() else {
            return Self::default();
        };
        let mut recent: Vec<String> = history
            .iter()
            .take(SUMMARY_LEN)
            .map(|run| status::classify(run.status.as_deref()))
            .collect();
        recent.reverse();
        Self {
            last_status: Some(status::classify(latest.status.as_deref())),
            last_time: latest.time.clone(),
            recent,
        }
    }
}
