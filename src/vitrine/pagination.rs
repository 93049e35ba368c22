//! # Pagination
//!
//! Two pure computations over host-owned [`PaginationState`]:
//!
//! - the range line, `Showing 21 to 25 of 25`
//! - the page window: first page, last page, the current page with its
//!   neighbors, and an ellipsis wherever numbers are skipped
//!
//! ```text
//! total 4,  current 2   1 2 3 4
//! total 10, current 1   1 2 … 10
//! total 10, current 7   1 … 6 7 8 … 10
//! ```
//!
//! [`PaginationController`] turns navigation intents into [`PageRequest`]s,
//! refusing the ones that would not change anything.

use serde::{Deserialize, Serialize};

/// Windows at or below this many pages list every page.
pub const FULL_WINDOW_MAX: u32 = 5;

/// Pagination as supplied by the host. Always normalized:
/// `1 <= current_page <= max(total_pages, 1)`, `limit > 0` and the
/// `has_next`/`has_prev` flags agree with the page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPagination")]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    #[serde(default = "first_page")]
    current_page: u32,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_count: u64,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl From<RawPagination> for PaginationState {
    fn from(raw: RawPagination) -> Self {
        match raw.total_pages {
            Some(total_pages) => {
                Self::from_parts(raw.current_page, total_pages, raw.total_count, raw.limit)
            }
            None => Self::new(raw.current_page, raw.limit, raw.total_count),
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(1, default_limit(), 0)
    }
}

impl PaginationState {
    /// Derives the page count from `total_count` and `limit`.
    pub fn new(current_page: u32, limit: u32, total_count: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_count.div_ceil(u64::from(limit));
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        Self::from_parts(current_page, total_pages, total_count, limit)
    }

    /// Accepts a host-computed page count, clamping whatever is out of range.
    pub fn from_parts(current_page: u32, total_pages: u32, total_count: u64, limit: u32) -> Self {
        let current_page = current_page.clamp(1, total_pages.max(1));
        Self {
            current_page,
            total_pages,
            total_count,
            limit: limit.max(1),
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    /// One-based index of the first record on the page, 0 when there are none.
    ///
    /// Never past [`last_index`](Self::last_index), even when a host-supplied
    /// page count disagrees with `total_count`.
    pub fn first_index(&self) -> u64 {
        if self.total_count == 0 {
            return 0;
        }
        ((u64::from(self.current_page) - 1) * u64::from(self.limit) + 1).min(self.last_index())
    }

    pub fn last_index(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.limit)).min(self.total_count)
    }

    pub fn range_label(&self) -> String {
        range_label(self.current_page, self.limit, self.total_count)
    }

    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// `Showing X to Y of Z`. An empty result reads `Showing 0 to 0 of 0`.
pub fn range_label(current_page: u32, limit: u32, total_count: u64) -> String {
    if total_count == 0 {
        return "Showing 0 to 0 of 0".to_string();
    }
    let page = u64::from(current_page.max(1));
    let limit = u64::from(limit.max(1));
    let last = (page * limit).min(total_count);
    let first = ((page - 1) * limit + 1).min(last);
    format!("Showing {} to {} of {}", first, last, total_count)
}

/// Page numbers and ellipsis markers for a pagination control.
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= FULL_WINDOW_MAX {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total_pages - 1);

    let mut window = vec![PageItem::Page(1)];
    if start > 2 {
        window.push(PageItem::Ellipsis);
    }
    window.extend((start..=end).map(PageItem::Page));
    if end < total_pages - 1 {
        window.push(PageItem::Ellipsis);
    }
    window.push(PageItem::Page(total_pages));
    window
}

/// A navigation the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Page(u32),
    /// The host resets to page 1 when applying this.
    PageSize(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    page_sizes: Vec<u32>,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(vec![10, 20, 50, 100])
    }
}

impl PaginationController {
    pub fn new(page_sizes: Vec<u32>) -> Self {
        Self { page_sizes }
    }

    pub fn page_sizes(&self) -> &[u32] {
        &self.page_sizes
    }

    pub fn go_to(&self, state: &PaginationState, page: u32) -> Option<PageRequest> {
        if page == 0 || page > state.total_pages || page == state.current_page {
            tracing::debug!(page, total = state.total_pages, "page request ignored");
            return None;
        }
        Some(PageRequest::Page(page))
    }

    pub fn next(&self, state: &PaginationState) -> Option<PageRequest> {
        state
            .has_next
            .then(|| PageRequest::Page(state.current_page + 1))
    }

    pub fn prev(&self, state: &PaginationState) -> Option<PageRequest> {
        state
            .has_prev
            .then(|| PageRequest::Page(state.current_page - 1))
    }

    pub fn change_page_size(&self, state: &PaginationState, limit: u32) -> Option<PageRequest> {
        if limit == 0 || limit == state.limit {
            return None;
        }
        Some(PageRequest::PageSize(limit))
    }

    pub fn view(&self, state: &PaginationState) -> PaginationView {
        let mut page_sizes = self.page_sizes.clone();
        if !page_sizes.contains(&state.limit) {
            page_sizes.push(state.limit);
            page_sizes.sort_unstable();
        }
        PaginationView {
            range: state.range_label(),
            window: state.window(),
            current_page: state.current_page,
            total_pages: state.total_pages,
            has_prev: state.has_prev,
            has_next: state.has_next,
            limit: state.limit,
            page_sizes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub range: String,
    pub window: Vec<PageItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub limit: u32,
    pub page_sizes: Vec<u32>,
}
