//! Pagination controls derived from the total count and current page.

use serde::{Deserialize, Serialize};

/// Records per page, fixed for the whole system.
pub const PAGE_SIZE: u32 = 10;

/// Maximum number of page buttons shown at once.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// A click on one of the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNavigation {
    /// The "Previous" button.
    Previous,
    /// The "Next" button.
    Next,
    /// A numbered page button.
    Page(u32),
}

/// What the pagination bar shows. Recomputed on every render, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationView {
    /// Number of pages in the result set.
    pub total_pages: u32,
    /// Page numbers with a button, in ascending order.
    pub visible_pages: Vec<u32>,
    /// Whether "Previous" is enabled.
    pub can_go_prev: bool,
    /// Whether "Next" is enabled.
    pub can_go_next: bool,
    /// The page the view was computed for.
    pub current_page: u32,
}

impl PaginationView {
    /// Computes the view with the system page size and button count.
    #[must_use]
    pub fn new(total_count: u64, page: u32) -> Self {
        Self::compute(total_count, page, PAGE_SIZE, MAX_VISIBLE_PAGES)
    }

    /// Computes the view for arbitrary sizes.
    ///
    /// With one page or fewer there are no controls at all.
    #[must_use]
    pub fn compute(total_count: u64, page: u32, page_size: u32, max_visible: u32) -> Self {
        let total_pages = total_pages(total_count, page_size);
        if total_pages <= 1 {
            return Self {
                total_pages,
                visible_pages: Vec::new(),
                can_go_prev: false,
                can_go_next: false,
                current_page: page,
            };
        }

        let max_visible = max_visible.max(1);
        let current = page.clamp(1, total_pages);
        let mut start = current.saturating_sub(max_visible / 2).max(1);
        let end = start
            .saturating_add(max_visible - 1)
            .min(total_pages);
        if end - start + 1 < max_visible {
            start = end.saturating_add(1).saturating_sub(max_visible).max(1);
        }

        Self {
            total_pages,
            visible_pages: (start..=end).collect(),
            can_go_prev: page > 1,
            can_go_next: page < total_pages,
            current_page: page,
        }
    }

    /// Returns true if any pagination control should be rendered.
    #[must_use]
    pub fn has_controls(&self) -> bool {
        !self.visible_pages.is_empty()
    }

    /// Returns the page a control would request, or `None` if it is disabled.
    #[must_use]
    pub fn target(&self, navigation: PageNavigation) -> Option<u32> {
        match navigation {
            PageNavigation::Previous => self.can_go_prev.then(|| self.current_page - 1),
            PageNavigation::Next => self.can_go_next.then(|| self.current_page + 1),
            PageNavigation::Page(page) => {
                (self.has_controls() && (1..=self.total_pages).contains(&page)).then_some(page)
            }
        }
    }
}

fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The 1-based item numbers shown on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRange {
    /// First item number on the page.
    pub first: u64,
    /// Last item number on the page.
    pub last: u64,
    /// Total items across all pages.
    pub total: u64,
}

impl ItemRange {
    /// Computes the range for `page`, or `None` when nothing matches.
    #[must_use]
    pub fn new(total_count: u64, page: u32) -> Option<Self> {
        if total_count == 0 || page == 0 {
            return None;
        }
        let size = u64::from(PAGE_SIZE);
        let first = (u64::from(page) - 1) * size + 1;
        if first > total_count {
            return None;
        }
        let last = (u64::from(page) * size).min(total_count);
        Some(Self {
            first,
            last,
            total: total_count,
        })
    }
}

impl std::fmt::Display for ItemRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {}-{} of {} records",
            self.first, self.last, self.total
        )
    }
}
