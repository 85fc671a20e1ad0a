//! Toolbar and pagination selections for one list session.

use catalog_types::domain::{Category, PageSize, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
}

impl SortSpec {
    pub fn new(key: SortKey) -> Self {
        Self { key }
    }
}

/// Current search text, category, sort, page and page size.
///
/// `page` is always at least 1. Changing the page size snaps back to the first
/// page, since the old offset no longer points at the same rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    query: String,
    category: Category,
    sort: SortSpec,
    page: u32,
    limit: PageSize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl QueryState {
    pub fn new(limit: PageSize) -> Self {
        Self {
            query: String::new(),
            category: Category::All,
            sort: SortSpec::default(),
            page: 1,
            limit,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> PageSize {
        self.limit
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: PageSize) {
        self.limit = limit;
        self.page = 1;
    }

    /// Clears the toolbar. The page size is a display preference and survives.
    pub fn reset(&mut self) {
        self.query.clear();
        self.category = Category::All;
        self.sort = SortSpec::default();
        self.page = 1;
    }
}
