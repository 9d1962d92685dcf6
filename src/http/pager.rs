//! Pagination math for list endpoints.

/// Query key used to indicate the requested page.
pub const QUERY_KEY: &str = "page";

/// Pages a result set via a `page` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    /// Total items in the result set.
    pub items: usize,

    /// Current page number, 1-based.
    pub page: usize,

    /// Items displayed per page.
    pub items_per_page: usize,

    /// Total pages in the result set.
    pub pages: usize,
}

impl Pager {
    /// Create a pager from the raw `page` query value, if any.
    ///
    /// Anything unparseable or non-positive falls back to page 1.
    pub fn new(page_param: Option<&str>, items_per_page: usize) -> Self {
        let page = page_param
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|&p| p > 0)
            .unwrap_or(1);

        Self {
            items: 0,
            page,
            items_per_page,
            pages: 1,
        }
    }

    /// Set the total item count and recompute the page count.
    ///
    /// Clamps the current page back into range when it overshoots.
    pub fn set_items(&mut self, items: usize) {
        self.items = items;

        self.pages = if items > 0 {
            items.div_ceil(self.items_per_page)
        } else {
            1
        };

        if self.page > self.pages {
            self.page = self.pages;
        }
    }

    /// Whether the pager is at the first page.
    pub fn is_beginning(&self) -> bool {
        self.page == 1
    }

    /// Whether the pager is at (or past) the last page.
    pub fn is_end(&self) -> bool {
        self.page >= self.pages
    }

    /// Offset of the current page's first item in the result set.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.items_per_page
    }
}
