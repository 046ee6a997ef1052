#![allow(clippy::unwrap_used)]

use super::*;

const BASE: &str = "https://org.example.test/api/data/v9.2/msdyn_dataflows";

#[test]
fn empty_filters_only_select_active() {
    let q = build_query("", "", 50);
    assert_eq!(q.filter, "statecode eq 0");
    assert!(q.expand.is_none());
    assert!(q.count);
    assert_eq!(q.top, 50);
    assert_eq!(q.order_by, "msdyn_name asc");
    assert!(q.select.starts_with("msdyn_dataflowid,msdyn_name,"));
    assert!(q.select.ends_with(",_ownerid_value"));
}

#[test]
fn name_filter_matches_name_or_description() {
    let q = build_query("sales", "", 50);
    assert_eq!(
        q.filter,
        "statecode eq 0 and (contains(msdyn_name, 'sales') or contains(msdyn_description, 'sales'))"
    );
    assert!(q.expand.is_none());
}

#[test]
fn name_filter_quotes_are_doubled() {
    let q = build_query("O'Brien", "", 50);
    assert!(q.filter.contains("'O''Brien'"));
    assert!(!q.filter.contains("'O'Brien'"));
}

#[test]
fn owner_filter_requests_expansion() {
    let q = build_query("", "Jane", 50);
    assert_eq!(
        q.filter,
        "statecode eq 0 and contains(owninguser/fullname, 'Jane')"
    );
    assert_eq!(q.expand.as_deref(), Some("owninguser($select=fullname)"));
}

#[test]
fn name_filter_alone_does_not_expand() {
    assert!(build_query("Jane", "", 50).expand.is_none());
}

#[test]
fn owner_filter_quotes_are_doubled() {
    let q = build_query("", "D'Arcy", 50);
    assert!(q.filter.contains("'D''Arcy'"));
}

#[test]
fn both_filters_are_joined_with_and() {
    let q = build_query("etl", "Jane", 25);
    assert_eq!(
        q.filter,
        "statecode eq 0 and (contains(msdyn_name, 'etl') or contains(msdyn_description, 'etl')) \
         and contains(owninguser/fullname, 'Jane')"
    );
    assert_eq!(q.top, 25);
}

#[test]
fn pathological_input_still_builds() {
    for input in ["'", "''''", "ünïcødé ✓", "a&b=c#d", "%20", "\n\t"] {
        let q = build_query(input, input, 10);
        assert!(q.filter.starts_with("statecode eq 0 and "));
        // Every quote in the filter must come in a balanced pair of literals.
        assert_eq!(q.filter.matches('\'').count() % 2, 0, "input {input:?}");
    }
}

#[test]
fn zero_page_size_is_clamped() {
    assert_eq!(build_query("", "", 0).top, 1);
}

#[test]
fn params_are_ordered_and_expand_is_last() {
    let keys: Vec<_> = build_query("", "Jane", 50)
        .params()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        ["$select", "$filter", "$count", "$top", "$orderby", "$expand"]
    );
}

#[test]
fn url_encodes_values() {
    let url = build_query("a&b #1", "", 50).to_url(BASE);
    assert!(url.starts_with(&format!("{BASE}?$select=")));
    assert!(url.contains("&$count=true&$top=50&$orderby=msdyn_name%20asc"));
    assert!(url.contains("a%26b%20%231"));
    assert!(!url.contains('#'));
    assert!(!url.contains(' '));
}

#[test]
fn url_tolerates_trailing_separators_on_base() {
    let q = build_query("", "", 50);
    assert_eq!(q.to_url(&format!("{BASE}/")), q.to_url(BASE));
    assert_eq!(q.to_url(&format!("{BASE}?")), q.to_url(BASE));
}
