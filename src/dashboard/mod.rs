//! The dashboard state owner.
//!
//! [`Dashboard`] ties the filter debouncers, the query builder and the
//! paginator together. It never performs I/O itself: operations that need
//! data return a [`PageRequest`], the caller fetches it (synchronously or on
//! a worker) and hands the outcome back through [`Dashboard::complete`].
//! Presentation reads everything through [`Dashboard::snapshot`].

use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::model::{DataflowView, ODataPage};
use crate::pagination::{PageRequest, PageResult, PageSnapshot, Paginator};
use crate::query::{self, QueryDescriptor};
use crate::sample;

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct DashboardSnapshot<'a> {
    pub records: &'a [DataflowView],
    pub page: PageSnapshot,
    /// User-visible error message, set when the last fetch failed.
    pub banner: Option<&'a str>,
    /// Whether the records are the built-in sample dataset.
    pub demo: bool,
    /// Whether a fetch for the current view is outstanding.
    pub loading: bool,
    pub name_filter: &'a str,
    pub owner_filter: &'a str,
}

#[derive(Debug)]
pub struct Dashboard {
    base_url: String,
    page_size: u32,
    debounce: Duration,
    name_filter: Debouncer<String>,
    owner_filter: Debouncer<String>,
    query: QueryDescriptor,
    paginator: Paginator,
    records: Vec<DataflowView>,
    banner: Option<String>,
    demo: bool,
    loading: bool,
}

impl Dashboard {
    pub fn new(base_url: impl Into<String>, page_size: u32, debounce: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            page_size,
            debounce,
            name_filter: Debouncer::new(String::new(), debounce),
            owner_filter: Debouncer::new(String::new(), debounce),
            query: query::build_query("", "", page_size),
            paginator: Paginator::new(page_size),
            records: Vec::new(),
            banner: None,
            demo: false,
            loading: false,
        }
    }

    /// Start with filters already settled, skipping the debounce.
    #[must_use]
    pub fn with_filters(mut self, name: &str, owner: &str) -> Self {
        self.name_filter = Debouncer::new(name.to_string(), self.debounce);
        self.owner_filter = Debouncer::new(owner.to_string(), self.debounce);
        self.query = query::build_query(name, owner, self.page_size);
        self
    }

    /// Rebuild the query from the settled filters and load its first page.
    pub fn start(&mut self) -> PageRequest {
        self.query = query::build_query(
            self.name_filter.settled(),
            self.owner_filter.settled(),
            self.page_size,
        );
        let url = self.query.to_url(&self.base_url);
        let req = self.paginator.reset(url);
        self.begin_fetch();
        req
    }

    pub fn set_name_filter(&mut self, text: &str, now: Instant) {
        self.name_filter.set(text.to_string(), now);
    }

    pub fn set_owner_filter(&mut self, text: &str, now: Instant) {
        self.owner_filter.set(text.to_string(), now);
    }

    /// The earliest moment a pending filter edit will settle.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.name_filter.deadline(), self.owner_filter.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Settle due filter edits. If either filter changed, the query is rebuilt
    /// once and paging restarts from page 1.
    pub fn tick(&mut self, now: Instant) -> Option<PageRequest> {
        let name_changed = self.name_filter.poll(now).is_some();
        let owner_changed = self.owner_filter.poll(now).is_some();
        (name_changed || owner_changed).then(|| self.start())
    }

    /// Load the following page, if the pagination bar would allow it.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if !self.paginator.snapshot().has_next {
            return None;
        }
        let req = self.paginator.go_next()?;
        self.begin_fetch();
        Some(req)
    }

    /// Load the previous page. `None` on page 1.
    pub fn prev_page(&mut self) -> Option<PageRequest> {
        let req = self.paginator.go_prev()?;
        self.begin_fetch();
        Some(req)
    }

    /// Apply the outcome of the fetch issued as `seq`.
    ///
    /// Returns `false` when the outcome belongs to a superseded request and
    /// was dropped. A failure switches to the sample dataset and puts the
    /// error on the banner.
    pub fn complete(&mut self, seq: u64, result: anyhow::Result<ODataPage>) -> bool {
        if !self.paginator.is_latest(seq) {
            tracing::debug!(seq, "dropping response to superseded request");
            return false;
        }
        match result {
            Ok(page) => {
                let paging = PageResult {
                    next_token: page.next_link,
                    total_count: page.count,
                };
                self.paginator.accept(seq, &paging);
                self.records = page.records.into_iter().map(DataflowView::new).collect();
                self.loading = false;
            }
            Err(e) => {
                self.paginator.fail(seq);
                self.fall_back(format!("Failed to fetch data: {e:#}. Running in Demo Mode."));
            }
        }
        true
    }

    /// Show the sample dataset without contacting the service.
    pub fn load_demo(&mut self, reason: &str) {
        self.paginator.clear();
        self.fall_back(reason.to_string());
    }

    fn fall_back(&mut self, banner: String) {
        tracing::info!("{banner}");
        self.records = sample::dataflows().into_iter().map(DataflowView::new).collect();
        self.banner = Some(banner);
        self.demo = true;
        self.loading = false;
    }

    fn begin_fetch(&mut self) {
        self.loading = true;
        self.banner = None;
        self.demo = false;
    }

    pub fn snapshot(&self) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            records: &self.records,
            page: self.paginator.snapshot(),
            banner: self.banner.as_deref(),
            demo: self.demo,
            loading: self.loading,
            name_filter: self.name_filter.latest(),
            owner_filter: self.owner_filter.latest(),
        }
    }

    /// The listed record at 0-based `index`.
    pub fn record(&self, index: usize) -> Option<&DataflowView> {
        self.records.get(index)
    }

    /// The listed record with the given id or name.
    pub fn find(&self, key: &str) -> Option<&DataflowView> {
        self.records.iter().find(|v| v.matches(key))
    }

    /// The query the current view was built from.
    pub const fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    pub const fn paginator(&self) -> &Paginator {
        &self.paginator
    }
}

#[cfg(test)]
mod tests;
