//! Plain-text views of the dashboard: the record table, the pagination bar
//! and the detail panel.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::dashboard::DashboardSnapshot;
use crate::history::{HistoryEntry, time};
use crate::model::DataflowView;
use crate::pagination::PageSnapshot;
use crate::status;

const UNKNOWN_TIME: &str = "Unknown Time";
const NOT_AVAILABLE: &str = "N/A";
const NAME_WIDTH: usize = 32;
const OWNER_WIDTH: usize = 20;

/// Human-friendly age of `timestamp` relative to `now`.
pub fn relative_time(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(then) = timestamp.and_then(time::parse) else {
        return UNKNOWN_TIME.to_string();
    };
    #[allow(clippy::cast_precision_loss)]
    let seconds = ((now - then).num_milliseconds() as f64 / 1000.0).round();
    if seconds < 1.0 {
        return "Just now".to_string();
    }
    if seconds < 60.0 {
        return format!("{seconds} seconds ago");
    }
    let minutes = (seconds / 60.0).round();
    if minutes < 60.0 {
        return format!("{minutes} minutes ago");
    }
    let hours = (minutes / 60.0).round();
    if hours < 24.0 {
        return format!("{hours} hours ago");
    }
    let days = (hours / 24.0).round();
    format!("{days} days ago")
}

/// Absolute timestamp for the history table; unparsable input is shown as-is.
pub fn absolute_time(timestamp: Option<&str>) -> String {
    match timestamp {
        None => UNKNOWN_TIME.to_string(),
        Some(raw) => time::parse(raw).map_or_else(
            || raw.to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The recent-runs strip, one glyph per run, oldest first.
pub fn summary_strip(recent: &[String]) -> String {
    recent
        .iter()
        .map(|s| status::tone(s).glyph())
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// "Showing 1 to 50 of 1,234 results | Page 1 of 25 | [prev] [next]".
///
/// `None` when there is nothing to page through.
pub fn pagination_bar(page: &PageSnapshot) -> Option<String> {
    if page.total_count == 0 {
        return None;
    }
    let prev = if page.has_prev { "[p]rev" } else { "prev" };
    let next = if page.has_next { "[n]ext" } else { "next" };
    Some(format!(
        "Showing {} to {} of {} results | Page {} of {} | {prev} {next}",
        page.first_index,
        page.last_index,
        group_thousands(page.total_count),
        page.current_page,
        group_thousands(page.total_pages),
    ))
}

/// The record table, one numbered row per dataflow.
pub fn table(records: &[DataflowView], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return "No dataflows found\nTry adjusting your filter criteria or check if any dataflows exist.\n"
            .to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<NAME_WIDTH$}  {:<OWNER_WIDTH$}  {:<24}  {:<5}  MODIFIED",
        "#", "NAME", "OWNER", "LAST REFRESH", "RUNS"
    );
    for (i, view) in records.iter().enumerate() {
        let record = &view.record;
        let last = view.summary.last_status.as_ref().map_or_else(
            || "No history".to_string(),
            |s| format!("{s} {}", relative_time(view.summary.last_time.as_deref(), now)),
        );
        let _ = writeln!(
            out,
            "{:>3}  {:<NAME_WIDTH$}  {:<OWNER_WIDTH$}  {:<24}  {:<5}  {}",
            i + 1,
            truncate(&record.name, NAME_WIDTH),
            truncate(record.owner.as_deref().unwrap_or(NOT_AVAILABLE), OWNER_WIDTH),
            truncate(&last, 24),
            summary_strip(&view.summary.recent),
            relative_time(record.modified_on.as_deref(), now),
        );
    }
    out
}

/// The full list screen: banner, filters, pagination bar and table.
pub fn screen(snapshot: &DashboardSnapshot<'_>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if let Some(banner) = snapshot.banner {
        let _ = writeln!(out, "!! {banner}");
    } else if snapshot.demo {
        let _ = writeln!(out, "!! Demo Mode: showing sample data.");
    }
    if !snapshot.name_filter.is_empty() || !snapshot.owner_filter.is_empty() {
        let _ = writeln!(
            out,
            "search: {:?}  owner: {:?}",
            snapshot.name_filter, snapshot.owner_filter
        );
    }
    if snapshot.loading {
        let _ = writeln!(out, "Fetching dataflows...");
        return out;
    }
    if let Some(bar) = pagination_bar(&snapshot.page) {
        let _ = writeln!(out, "{bar}");
    }
    out.push_str(&table(snapshot.records, now));
    out
}

fn item(out: &mut String, label: &str, value: Option<&str>) {
    let value = value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE);
    let _ = writeln!(out, "{label}\n  {value}");
}

fn code_box(out: &mut String, title: &str, data: Option<&str>) {
    match data.filter(|d| !d.is_empty()) {
        None => item(out, title, Some("Not available")),
        Some(data) => {
            let _ = writeln!(out, "{title}");
            for line in data.lines() {
                let _ = writeln!(out, "  | {line}");
            }
        }
    }
}

fn history_table(out: &mut String, raw: Option<&str>, history: &[HistoryEntry]) {
    if raw.is_none_or(str::is_empty) {
        item(out, "Refresh History", Some("No history available"));
        return;
    }
    let _ = writeln!(out, "Refresh History");
    if history.is_empty() {
        let _ = writeln!(out, "  Could not parse history or no records found.");
        return;
    }
    out.push_str(&history_rows(history));
}

/// Start-time / status rows for a normalized history.
pub fn history_rows(history: &[HistoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<25}  STATUS", "START TIME");
    for run in history {
        let display = status::classify(run.status.as_deref());
        let _ = writeln!(
            out,
            "  {:<25}  {} {display}",
            absolute_time(run.time.as_deref()),
            status::tone(&display).glyph(),
        );
    }
    out
}

/// The detail panel for one dataflow.
pub fn detail(view: &DataflowView) -> String {
    let record = &view.record;
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", record.name);
    item(&mut out, "Description", record.description.as_deref());
    item(&mut out, "Dataflow ID", Some(&record.id));
    item(&mut out, "Owner", record.owner.as_deref());
    let modified = record
        .modified_on
        .as_deref()
        .map(|t| absolute_time(Some(t)));
    item(&mut out, "Last Modified", modified.as_deref());
    item(&mut out, "Internal Version", record.internal_version.as_deref());
    item(&mut out, "Gateway Object ID", record.gateway_object_id.as_deref());
    item(
        &mut out,
        "Destination ADLS",
        record.destination_adls_label.as_deref(),
    );
    history_table(&mut out, record.refresh_history.as_deref(), &view.history);
    code_box(&mut out, "Mashup Document", record.mashup_document.as_deref());
    code_box(&mut out, "Refresh Settings", record.refresh_settings.as_deref());
    code_box(&mut out, "Mashup Settings", record.mashup_settings.as_deref());
    code_box(&mut out, "Email Settings", record.email_settings.as_deref());
    out
}
