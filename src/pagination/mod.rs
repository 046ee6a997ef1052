//! Cursor-based paging over a service that only hands out "next" links.
//!
//! The service returns a continuation URL for the following page but never
//! one for the previous page, so every cursor used to reach the current page
//! is kept on a stack. Each issued fetch carries a sequence number; only the
//! response to the most recently issued fetch may change state.

/// A fetch the caller should perform on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub cursor: String,
}

/// The paging-relevant part of a fetch response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub next_token: Option<String>,
    pub total_count: Option<u64>,
}

/// Point-in-time view of the paging state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSnapshot {
    pub current_page: usize,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    /// 1-based index of the first record on this page.
    pub first_index: u64,
    /// 1-based index of the last record on this page.
    pub last_index: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug)]
pub struct Paginator {
    page_size: u32,
    current_page: usize,
    cursor_stack: Vec<String>,
    total_count: u64,
    next_token: Option<String>,
    last_seq: u64,
}

impl Paginator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            cursor_stack: Vec::new(),
            total_count: 0,
            next_token: None,
            last_seq: 0,
        }
    }

    /// Start over on page 1 of a new query whose first-page cursor is `initial`.
    pub fn reset(&mut self, initial: String) -> PageRequest {
        self.current_page = 1;
        self.cursor_stack = vec![initial.clone()];
        self.next_token = None;
        self.issue(initial)
    }

    /// Move to the following page. Returns `None` when there is no next link.
    pub fn go_next(&mut self) -> Option<PageRequest> {
        let next = self.next_token.take()?;
        self.cursor_stack.push(next.clone());
        self.current_page += 1;
        Some(self.issue(next))
    }

    /// Move back one page. Returns `None` on the first page.
    pub fn go_prev(&mut self) -> Option<PageRequest> {
        if self.current_page <= 1 || self.cursor_stack.len() < 2 {
            return None;
        }
        self.cursor_stack.pop();
        self.current_page -= 1;
        self.next_token = None;
        let cursor = self.cursor_stack.last()?.clone();
        Some(self.issue(cursor))
    }

    /// Apply a successful response. Returns `false` (and changes nothing)
    /// when `seq` is not the most recently issued request.
    pub fn accept(&mut self, seq: u64, result: &PageResult) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.next_token.clone_from(&result.next_token);
        if let Some(count) = result.total_count {
            self.total_count = count;
        }
        true
    }

    /// Apply a failed response: back to page 1 with no cursors and no count.
    /// Returns `false` (and changes nothing) for a stale `seq`.
    pub fn fail(&mut self, seq: u64) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.clear();
        true
    }

    /// Forget every cursor and count without issuing a request.
    pub fn clear(&mut self) {
        self.current_page = 1;
        self.cursor_stack.clear();
        self.next_token = None;
        self.total_count = 0;
    }

    pub const fn is_latest(&self, seq: u64) -> bool {
        seq == self.last_seq && seq != 0
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    pub fn cursor_stack(&self) -> &[String] {
        &self.cursor_stack
    }

    /// Cursor of the page currently displayed.
    pub fn current_cursor(&self) -> Option<&str> {
        self.cursor_stack.last().map(String::as_str)
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let size = u64::from(self.page_size);
        let total_pages = self.total_count.div_ceil(size);
        let page = self.current_page as u64;
        let first_index = (page - 1) * size + 1;
        let last_index = (page * size).min(self.total_count);
        let on_last_page = self.total_count > 0 && page >= total_pages;
        PageSnapshot {
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages,
            first_index,
            last_index,
            has_prev: self.current_page > 1,
            has_next: self.next_token.is_some() && !on_last_page,
        }
    }

    fn issue(&mut self, cursor: String) -> PageRequest {
        self.last_seq += 1;
        tracing::debug!(seq = self.last_seq, page = self.current_page, "issuing page fetch");
        PageRequest {
            seq: self.last_seq,
            cursor,
        }
    }
}
