//! Pure table pipeline
//!
//! Provides the filter → sort → paginate functions and the [`Page`] they
//! produce. Nothing here mutates the source rows.

use crate::tabular::Tabular;
use coopex_record::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Ascending,

    /// Largest first (the direction a newly clicked column starts with)
    #[default]
    Descending,
}

impl SortDirection {
    /// Opposite direction
    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Field to sort on
    pub key: String,

    /// Direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    /// Descending sort on `key`
    #[inline]
    #[must_use]
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Ascending sort on `key`
    #[inline]
    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// State after a click on the header of `key`
    ///
    /// Same key flips the direction; a different key starts descending.
    #[must_use]
    pub fn clicked(current: Option<&SortState>, key: &str) -> Self {
        match current {
            Some(sort) if sort.key == key => Self {
                key: sort.key.clone(),
                direction: sort.direction.flipped(),
            },
            _ => Self::descending(key),
        }
    }
}

/// Everything the pipeline needs besides the rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Free-text search term; empty matches all rows
    pub search: String,

    /// Active sort, `None` keeps source order
    pub sort: Option<SortState>,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub items_per_page: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            items_per_page: 10,
        }
    }
}

/// One page of results with pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, R> {
    /// Rows of the current page
    pub rows: Vec<&'a R>,

    /// Page actually shown (1-based)
    pub current_page: usize,

    /// `ceil(total_items / items_per_page)`
    pub total_pages: usize,

    /// Rows matching the search
    pub total_items: usize,

    /// Page size used
    pub items_per_page: usize,
}

/// Check if any of `fields` contains `term` (case-insensitive)
///
/// An empty term matches every row.
#[must_use]
pub fn matches_search<R, S>(row: &R, term: &str, fields: &[S]) -> bool
where
    R: Tabular + ?Sized,
    S: AsRef<str>,
{
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|field| {
        row.cell(field.as_ref())
            .is_some_and(|cell| cell.to_string().to_lowercase().contains(&needle))
    })
}

/// Rows matching the search term, in source order
#[must_use]
pub fn filter_rows<'a, R, S>(rows: &'a [R], term: &str, fields: &[S]) -> Vec<&'a R>
where
    R: Tabular,
    S: AsRef<str>,
{
    rows.iter()
        .filter(|row| matches_search(*row, term, fields))
        .collect()
}

/// Compare two rows on one field; missing cells compare as empty text
#[must_use]
pub fn compare_rows<R: Tabular + ?Sized>(a: &R, b: &R, key: &str) -> Ordering {
    let empty = Value::Null;
    let left = a.cell(key).unwrap_or(&empty);
    let right = b.cell(key).unwrap_or(&empty);
    left.sort_cmp(right)
}

/// Stable sort of row references
pub fn sort_rows<R: Tabular>(rows: &mut [&R], sort: &SortState) {
    match sort.direction {
        SortDirection::Ascending => rows.sort_by(|a, b| compare_rows(*a, *b, &sort.key)),
        SortDirection::Descending => rows.sort_by(|a, b| compare_rows(*b, *a, &sort.key)),
    }
}

/// Number of pages for `count` rows
///
/// A page size of zero is treated as one.
#[inline]
#[must_use]
pub fn total_pages(count: usize, items_per_page: usize) -> usize {
    count.div_ceil(items_per_page.max(1))
}

/// Slice `[(page-1)*size, page*size)` of `rows`, clipped to the list
#[must_use]
pub fn paginate<T>(rows: &[T], page: usize, items_per_page: usize) -> &[T] {
    let size = items_per_page.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(rows.len());
    let end = start.saturating_add(size).min(rows.len());
    &rows[start..end]
}

/// Run filter → sort → paginate
///
/// A page of zero, or beyond the last page, shows page 1.
#[must_use]
pub fn run_query<'a, R, S>(rows: &'a [R], query: &TableQuery, search_fields: &[S]) -> Page<'a, R>
where
    R: Tabular,
    S: AsRef<str>,
{
    let mut matched = filter_rows(rows, &query.search, search_fields);
    if let Some(sort) = &query.sort {
        sort_rows(&mut matched, sort);
    }

    let items_per_page = query.items_per_page.max(1);
    let total_items = matched.len();
    let total_pages = total_pages(total_items, items_per_page);
    let current_page = if query.page == 0 || query.page > total_pages {
        1
    } else {
        query.page
    };

    let rows = paginate(&matched, current_page, items_per_page).to_vec();
    tracing::trace!(total_items, total_pages, current_page, "table page computed");

    Page {
        rows,
        current_page,
        total_pages,
        total_items,
        items_per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coopex_record::Record;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<Record> {
        vec![
            Record::new().with("codvar", 10).with("nomvar", "orange"),
            Record::new().with("codvar", "9").with("nomvar", "Gala"),
            Record::new().with("codvar", 11).with("nomvar", "golden"),
            Record::new().with("nomvar", "Sans code"),
        ]
    }

    fn names<'a>(rows: &[&'a Record]) -> Vec<String> {
        rows.iter().map(|r| r.value("nomvar").to_string()).collect()
    }

    #[test]
    fn clicked_policy() {
        let first = SortState::clicked(None, "codvar");
        assert_eq!(first, SortState::descending("codvar"));
        let second = SortState::clicked(Some(&first), "codvar");
        assert_eq!(second, SortState::ascending("codvar"));
        let other = SortState::clicked(Some(&second), "nomvar");
        assert_eq!(other, SortState::descending("nomvar"));
    }

    #[test]
    fn search_is_case_insensitive_on_any_field() {
        let rows = rows();
        assert_eq!(names(&filter_rows(&rows, "GOLD", &["nomvar"])), vec!["golden"]);
        assert_eq!(names(&filter_rows(&rows, "1", &["codvar", "nomvar"])), vec!["orange", "golden"]);
        assert_eq!(filter_rows(&rows, "", &["nomvar"]).len(), 4);
        assert!(filter_rows(&rows, "gala", &["codvar"]).is_empty());
    }

    #[test]
    fn numeric_sort_mixes_spellings() {
        let rows = rows();
        let mut refs: Vec<_> = rows.iter().collect();
        sort_rows(&mut refs, &SortState::ascending("codvar"));
        assert_eq!(names(&refs), vec!["Sans code", "Gala", "orange", "golden"]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let rows = rows();
        let mut refs: Vec<_> = rows.iter().collect();
        sort_rows(&mut refs, &SortState::descending("nomvar"));
        assert_eq!(names(&refs), vec!["Sans code", "orange", "golden", "Gala"]);
    }

    #[test]
    fn sort_is_stable() {
        let rows = vec![
            Record::new().with("k", 1).with("n", "a"),
            Record::new().with("k", 1).with("n", "b"),
            Record::new().with("k", 0).with("n", "c"),
        ];
        let mut refs: Vec<_> = rows.iter().collect();
        sort_rows(&mut refs, &SortState::descending("k"));
        let order: Vec<_> = refs.iter().map(|r| r.value("n").to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn pagination_sizes() {
        let items: Vec<u32> = (0..23).collect();
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(paginate(&items, 1, 10).len(), 10);
        assert_eq!(paginate(&items, 2, 10).len(), 10);
        assert_eq!(paginate(&items, 3, 10), &[20, 21, 22]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn run_query_resets_out_of_range_page() {
        let rows = rows();
        let query = TableQuery {
            page: 7,
            items_per_page: 2,
            ..TableQuery::default()
        };
        let page = run_query(&rows, &query, &["nomvar"]);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn run_query_on_empty_list() {
        let rows: Vec<Record> = Vec::new();
        let page = run_query(&rows, &TableQuery::default(), &["nomvar"]);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.rows.is_empty());
    }
}
