//! Page window arithmetic for paginated result lists.
//!
//! Everything here is a pure function of its inputs. Callers own the
//! pagination state and hand it in on every call.

use serde::Serialize;

/// Number of page numbers shown on each side of the current page.
pub const WINDOW_RADIUS: u32 = 2;

/// One entry of a rendered page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "lowercase")]
pub enum PageEntry {
    Page(u32),
    Ellipsis,
}

/// Page controls to display for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub entries: Vec<PageEntry>,
}

/// Number of pages needed for `total_items`; zero for non-positive inputs.
pub fn total_pages(total_items: i64, items_per_page: i64) -> u32 {
    if total_items <= 0 || items_per_page <= 0 {
        return 0;
    }
    let pages = (total_items as u64).div_ceil(items_per_page as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamp `requested` into `1..=total_pages`. With no pages at all the result is 1.
pub fn go_to_page(requested: i64, total_pages: u32) -> u32 {
    let upper = i64::from(total_pages.max(1));
    requested.clamp(1, upper) as u32
}

/// Compute the page window, or `None` when there is at most one page.
pub fn compute_page_window(
    current_page: u32,
    total_items: i64,
    items_per_page: i64,
) -> Option<PageWindow> {
    let total = total_pages(total_items, items_per_page);
    if total <= 1 {
        return None;
    }

    let current = go_to_page(i64::from(current_page), total);
    let low = current.saturating_sub(WINDOW_RADIUS).max(1);
    let high = current.saturating_add(WINDOW_RADIUS).min(total);

    let mut shown = Vec::with_capacity((high - low + 3) as usize);
    if low > 1 {
        shown.push(1);
    }
    shown.extend(low..=high);
    if high < total {
        shown.push(total);
    }

    let mut entries = Vec::with_capacity(shown.len() + 2);
    let mut previous: Option<u32> = None;
    for page in shown {
        if let Some(prev) = previous {
            match page - prev {
                1 => {}
                // a one-page gap shows the page itself
                2 => entries.push(PageEntry::Page(prev + 1)),
                _ => entries.push(PageEntry::Ellipsis),
            }
        }
        entries.push(PageEntry::Page(page));
        previous = Some(page);
    }

    Some(PageWindow {
        current_page: current,
        total_pages: total,
        has_previous: current > 1,
        has_next: current < total,
        entries,
    })
}

/// A user action on the page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    Page(u32),
}

/// Pagination state owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_items: i64,
    pub items_per_page: i64,
}

impl PaginationState {
    pub fn new(current_page: u32, total_items: i64, items_per_page: i64) -> Self {
        Self {
            current_page,
            total_items,
            items_per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.items_per_page)
    }

    pub fn window(&self) -> Option<PageWindow> {
        compute_page_window(self.current_page, self.total_items, self.items_per_page)
    }

    /// Zero-based offset of the first item on the current page.
    pub fn start_index(&self) -> u64 {
        let per_page = self.items_per_page.max(0) as u64;
        u64::from(self.current_page.saturating_sub(1)) * per_page
    }

    /// Jump to `requested`, clamped. `on_page_change` runs only when the
    /// clamped page differs from the current one.
    pub fn go_to_page(&self, requested: i64, on_page_change: impl FnOnce(u32)) -> u32 {
        let clamped = go_to_page(requested, self.total_pages());
        if clamped != self.current_page {
            on_page_change(clamped);
        }
        clamped
    }

    /// Apply a control action. Previous and Next are disabled at their
    /// boundary: nothing happens and `on_page_change` is not called.
    pub fn dispatch(&self, action: PageAction, on_page_change: impl FnOnce(u32)) -> u32 {
        let total = self.total_pages();
        match action {
            PageAction::Previous if self.current_page > 1 => {
                self.go_to_page(i64::from(self.current_page) - 1, on_page_change)
            }
            PageAction::Next if self.current_page < total => {
                self.go_to_page(i64::from(self.current_page) + 1, on_page_change)
            }
            PageAction::Previous | PageAction::Next => self.current_page,
            PageAction::Page(page) => self.go_to_page(i64::from(page), on_page_change),
        }
    }
}
