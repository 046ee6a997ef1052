#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::model::Dataflow;

const BASE: &str = "https://org.example.test/api/data/v9.2/msdyn_dataflows";
const DELAY: Duration = Duration::from_millis(500);

fn dashboard() -> Dashboard {
    Dashboard::new(BASE, 2, DELAY)
}

fn record(name: &str, history: Option<&str>) -> Dataflow {
    Dataflow {
        id: format!("id-{name}"),
        name: name.to_string(),
        refresh_history: history.map(ToOwned::to_owned),
        ..Dataflow::default()
    }
}

fn page(names: &[&str], next: Option<&str>, count: Option<u64>) -> ODataPage {
    ODataPage {
        records: names.iter().map(|n| record(n, None)).collect(),
        next_link: next.map(ToOwned::to_owned),
        count,
    }
}

fn names(d: &Dashboard) -> Vec<String> {
    d.snapshot()
        .records
        .iter()
        .map(|v| v.record.name.clone())
        .collect()
}

// --- start / first page ---

#[test]
fn start_requests_first_page_url() {
    let mut d = dashboard();
    let req = d.start();
    assert!(req.cursor.starts_with(&format!("{BASE}?$select=")));
    assert!(req.cursor.contains("$top=2"));
    assert!(d.snapshot().loading);
}

#[test]
fn first_page_populates_records_and_count() {
    let mut d = dashboard();
    let req = d.start();
    assert!(d.complete(req.seq, Ok(page(&["a", "b"], Some("next-2"), Some(3)))));

    let snap = d.snapshot();
    assert_eq!(names(&d), ["a", "b"]);
    assert_eq!(snap.page.total_count, 3);
    assert!(snap.page.has_next);
    assert!(!snap.loading);
    assert!(!snap.demo);
    assert!(snap.banner.is_none());
}

#[test]
fn records_carry_derived_history() {
    let mut d = dashboard();
    let req = d.start();
    let body = ODataPage {
        records: vec![record(
            "flow",
            Some(r#"[{"startTime":"2024-01-01T00:00:00Z","status":"Failed"},{"startTime":"2024-01-03T00:00:00Z","status":"Success"}]"#),
        )],
        ..ODataPage::default()
    };
    d.complete(req.seq, Ok(body));
    let view = d.record(0).unwrap();
    assert_eq!(view.summary.last_status.as_deref(), Some("Success"));
    assert_eq!(view.summary.last_time.as_deref(), Some("2024-01-03T00:00:00Z"));
    assert_eq!(view.summary.recent, ["Failed", "Success"]);
}

// --- paging ---

#[test]
fn count_is_kept_across_pages() {
    let mut d = dashboard();
    let req = d.start();
    d.complete(req.seq, Ok(page(&["a", "b"], Some("next-2"), Some(42))));
    let req = d.next_page().unwrap();
    assert_eq!(req.cursor, "next-2");
    d.complete(req.seq, Ok(page(&["c", "d"], Some("next-3"), None)));

    let snap = d.snapshot();
    assert_eq!(snap.page.current_page, 2);
    assert_eq!(snap.page.total_count, 42);
    assert_eq!(names(&d), ["c", "d"]);
}

#[test]
fn prev_returns_to_first_page_request() {
    let mut d = dashboard();
    let first = d.start();
    d.complete(first.seq, Ok(page(&["a", "b"], Some("next-2"), Some(3))));
    let second = d.next_page().unwrap();
    d.complete(second.seq, Ok(page(&["c"], None, None)));

    let back = d.prev_page().unwrap();
    assert_eq!(back.cursor, first.cursor);
    assert_eq!(d.snapshot().page.current_page, 1);
}

#[test]
fn prev_on_first_page_is_noop() {
    let mut d = dashboard();
    let req = d.start();
    d.complete(req.seq, Ok(page(&["a"], None, Some(1))));
    assert!(d.prev_page().is_none());
    assert!(!d.snapshot().loading);
}

#[test]
fn next_is_disabled_on_last_counted_page() {
    let mut d = dashboard();
    let req = d.start();
    // Two records, page size two: the link past the end must not be followed.
    d.complete(req.seq, Ok(page(&["a", "b"], Some("next-2"), Some(2))));
    assert!(!d.snapshot().page.has_next);
    assert!(d.next_page().is_none());
}

// --- filters ---

#[test]
fn filter_edit_settles_after_delay_and_resets_paging() {
    let t0 = Instant::now();
    let mut d = dashboard();
    let req = d.start();
    d.complete(req.seq, Ok(page(&["a", "b"], Some("next-2"), Some(9))));
    let req = d.next_page().unwrap();
    d.complete(req.seq, Ok(page(&["c", "d"], Some("next-3"), None)));

    d.set_name_filter("O'Brien", t0);
    assert!(d.tick(t0 + Duration::from_millis(100)).is_none());
    let req = d.tick(t0 + DELAY).unwrap();

    assert!(req.cursor.contains("O%27%27Brien"));
    assert_eq!(d.snapshot().page.current_page, 1);
    assert_eq!(d.paginator().cursor_stack(), [req.cursor.clone()]);
    assert!(d.query().filter.contains("'O''Brien'"));
}

#[test]
fn both_filters_settling_together_rebuild_once() {
    let t0 = Instant::now();
    let mut d = dashboard();
    d.start();
    d.set_name_filter("etl", t0);
    d.set_owner_filter("Jane", t0 + Duration::from_millis(50));

    assert!(d.tick(t0 + Duration::from_millis(520)).is_some());
    let q = d.query();
    assert!(q.filter.contains("'etl'"));
    // The owner edit is not due yet.
    assert!(!q.filter.contains("owninguser"));

    let req = d.tick(t0 + Duration::from_millis(600)).unwrap();
    assert!(req.cursor.contains("%24expand") || req.cursor.contains("$expand"));
    assert!(d.tick(t0 + Duration::from_millis(5_000)).is_none());
}

#[test]
fn simultaneous_settle_issues_single_request() {
    let t0 = Instant::now();
    let mut d = dashboard();
    let initial = d.start();
    d.set_name_filter("etl", t0);
    d.set_owner_filter("Jane", t0);
    let req = d.tick(t0 + DELAY).unwrap();
    assert_eq!(req.seq, initial.seq + 1);
    assert!(d.query().filter.contains("'etl'"));
    assert!(d.query().expand.is_some());
    assert!(d.tick(t0 + DELAY * 2).is_none());
}

#[test]
fn snapshot_shows_unsettled_filter_text() {
    let t0 = Instant::now();
    let mut d = dashboard();
    d.set_owner_filter("Ja", t0);
    assert_eq!(d.snapshot().owner_filter, "Ja");
    assert_eq!(d.next_deadline(), Some(t0 + DELAY));
}

#[test]
fn with_filters_applies_without_waiting() {
    let mut d = dashboard().with_filters("sales", "Jane");
    let req = d.start();
    assert!(d.query().filter.contains("'sales'"));
    assert!(d.query().expand.is_some());
    assert!(req.cursor.contains("sales"));
    assert!(d.next_deadline().is_none());
}

// --- ordering guard ---

#[test]
fn slow_stale_response_is_dropped() {
    let t0 = Instant::now();
    let mut d = dashboard();
    let stale = d.start();
    d.set_name_filter("fresh", t0);
    let fresh = d.tick(t0 + DELAY).unwrap();

    assert!(d.complete(fresh.seq, Ok(page(&["fresh"], None, Some(1)))));
    assert!(!d.complete(stale.seq, Ok(page(&["stale"], Some("x"), Some(99)))));

    assert_eq!(names(&d), ["fresh"]);
    assert_eq!(d.snapshot().page.total_count, 1);
}

#[test]
fn stale_failure_does_not_trigger_demo_mode() {
    let t0 = Instant::now();
    let mut d = dashboard();
    let stale = d.start();
    d.set_name_filter("fresh", t0);
    let fresh = d.tick(t0 + DELAY).unwrap();
    d.complete(fresh.seq, Ok(page(&["fresh"], None, Some(1))));

    assert!(!d.complete(stale.seq, Err(anyhow::anyhow!("timed out"))));
    assert!(!d.snapshot().demo);
    assert!(d.snapshot().banner.is_none());
}

// --- fallback ---

#[test]
fn fetch_failure_loads_sample_data_and_resets_paging() {
    let mut d = dashboard();
    let req = d.start();
    d.complete(req.seq, Ok(page(&["a", "b"], Some("next-2"), Some(10))));
    let req = d.next_page().unwrap();
    d.complete(req.seq, Err(anyhow::anyhow!("data service returned HTTP 500: boom")));

    let snap = d.snapshot();
    assert!(snap.demo);
    assert!(!snap.loading);
    assert_eq!(snap.page.current_page, 1);
    assert_eq!(snap.page.total_count, 0);
    assert!(!snap.page.has_next);
    assert!(!snap.page.has_prev);
    assert!(d.paginator().cursor_stack().is_empty());
    assert_eq!(snap.records.len(), crate::sample::dataflows().len());
    let banner = snap.banner.unwrap();
    assert!(banner.starts_with("Failed to fetch data: "));
    assert!(banner.contains("HTTP 500"));
    assert!(banner.ends_with("Running in Demo Mode."));
}

#[test]
fn new_request_clears_banner() {
    let mut d = dashboard();
    let req = d.start();
    d.complete(req.seq, Err(anyhow::anyhow!("offline")));
    assert!(d.snapshot().banner.is_some());

    let req = d.start();
    assert!(d.snapshot().banner.is_none());
    assert!(!d.snapshot().demo);
    d.complete(req.seq, Ok(page(&["a"], None, Some(1))));
    assert_eq!(names(&d), ["a"]);
}

#[test]
fn load_demo_without_request() {
    let mut d = dashboard();
    d.load_demo("Demo Mode: no data service configured.");
    let snap = d.snapshot();
    assert!(snap.demo);
    assert_eq!(snap.banner, Some("Demo Mode: no data service configured."));
    assert!(!snap.records.is_empty());
    assert!(d.find("Customer Master Sync").is_some());
    assert!(d.find("nope").is_none());
}
