//! Interactive table state
//!
//! Provides [`TableSpec`] (per-screen configuration) and [`TableState`]
//! (search box, header clicks and page buttons of one table view).

use crate::query::{matches_search, run_query, total_pages, Page, SortState, TableQuery};
use crate::tabular::Tabular;
use serde::{Deserialize, Serialize};

/// Page size used when a screen does not set one
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Per-screen table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Fields the search box looks into
    pub search_fields: Vec<String>,

    /// Sort applied before the first header click
    #[serde(default)]
    pub default_sort: Option<SortState>,

    /// Initial page size
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

impl TableSpec {
    /// Spec searching `fields`, unsorted, default page size
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: fields.into_iter().map(Into::into).collect(),
            default_sort: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }

    /// With an initial sort
    #[inline]
    #[must_use]
    pub fn with_default_sort(mut self, sort: SortState) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// With an initial page size
    #[inline]
    #[must_use]
    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }
}

/// State of one table view
///
/// # Policies
/// - A new search term or page size goes back to page 1
/// - Clicking the sorted column flips direction, clicking another column
///   sorts it descending
/// - When the list shrinks below the current page, the view returns to
///   page 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    search_fields: Vec<String>,
    search: String,
    sort: Option<SortState>,
    current_page: usize,
    items_per_page: usize,
}

impl TableState {
    /// Fresh state for a screen
    #[must_use]
    pub fn new(spec: &TableSpec) -> Self {
        Self {
            search_fields: spec.search_fields.clone(),
            search: String::new(),
            sort: spec.default_sort.clone(),
            current_page: 1,
            items_per_page: spec.items_per_page.max(1),
        }
    }

    /// Current search term
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Active sort
    #[inline]
    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Current page (1-based)
    #[inline]
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Page size
    #[inline]
    #[must_use]
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Change the search term and go back to page 1
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.current_page = 1;
    }

    /// Change the page size and go back to page 1
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Header click on `key`
    pub fn toggle_sort(&mut self, key: &str) {
        let sort = SortState::clicked(self.sort.as_ref(), key);
        tracing::debug!(key, direction = ?sort.direction, "sort toggled");
        self.sort = Some(sort);
    }

    /// Select a page; zero is treated as page 1
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Query describing the current state
    #[must_use]
    pub fn query(&self) -> TableQuery {
        TableQuery {
            search: self.search.clone(),
            sort: self.sort.clone(),
            page: self.current_page,
            items_per_page: self.items_per_page,
        }
    }

    /// Compute the visible page of `rows`
    ///
    /// Resets to page 1 first if the current page no longer exists.
    pub fn view<'a, R: Tabular>(&mut self, rows: &'a [R]) -> Page<'a, R> {
        let matched = rows
            .iter()
            .filter(|row| matches_search(*row, &self.search, &self.search_fields))
            .count();
        if self.current_page > total_pages(matched, self.items_per_page) {
            self.current_page = 1;
        }
        run_query(rows, &self.query(), &self.search_fields)
    }
}
