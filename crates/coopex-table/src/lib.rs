//! Coopex Table Engine
//!
//! Client-side search, sort and pagination for the dashboard's list
//! screens. The pipeline is pure (filter → sort → paginate) and
//! [`TableState`] layers the interactive policies on top of it.
//!
//! # Core Concepts
//!
//! - [`Tabular`]: Cell access for any row type
//! - [`run_query`]: The pure pipeline producing a [`Page`]
//! - [`SortState`]: Sort key and direction, with the header-click policy
//! - [`TableState`]: Search term, sort and page of one table view
//! - [`TableSpec`]: Per-screen search fields, default sort and page size
//!
//! # Example
//!
//! ```rust
//! use coopex_record::Record;
//! use coopex_table::{TableSpec, TableState};
//!
//! let rows: Vec<Record> = (0..23).map(|i| Record::new().with("numexp", i)).collect();
//! let mut state = TableState::new(&TableSpec::new(["numexp"]));
//!
//! state.go_to_page(3);
//! let page = state.view(&rows);
//! assert_eq!(page.total_pages, 3);
//! assert_eq!(page.rows.len(), 3);
//! ```

#![warn(unreachable_pub)]

mod query;
mod state;
mod tabular;

pub use query::{
    compare_rows, filter_rows, matches_search, paginate, run_query, sort_rows, total_pages, Page,
    SortDirection, SortState, TableQuery,
};
pub use state::{TableSpec, TableState, DEFAULT_ITEMS_PER_PAGE};
pub use tabular::Tabular;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
