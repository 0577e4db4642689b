//! Coopex Cascading Selection
//!
//! Dependent dropdown state for the dashboard forms: choosing a value at
//! one level filters the options of the next and clears everything below.
//!
//! # Core Concepts
//!
//! - [`Level`]: Field-name configuration of one dropdown
//! - [`CascadeChain`]: Validated parent/child ordering of levels
//! - [`CascadeController`]: Full lists, visible subsets and selections
//! - [`Selection`]: None, one value, or a set of values
//! - [`ChainRegistry`]: Named preset chains
//!
//! # Example
//!
//! ```rust
//! use coopex_cascade::{variety_chain, CascadeController};
//! use coopex_record::Record;
//!
//! let mut ctl = CascadeController::new(variety_chain());
//! ctl.set_source("culture", [Record::new().with("codcul", 1).with("nomcul", "Agrumes")]);
//! ctl.set_source(
//!     "variety",
//!     [Record::new().with("codvar", 10).with("codcul", 1).with("nomvar", "Orange")],
//! );
//!
//! ctl.set_value("culture", "1");
//! assert_eq!(ctl.visible_options("variety").len(), 1);
//! assert!(ctl.is_disabled("sub_variety"));
//! ```

#![warn(unreachable_pub)]

mod chain;
mod controller;
mod level;
mod registry;
mod selection;

pub use chain::{CascadeChain, ChainBuilder, ChainError};
pub use controller::CascadeController;
pub use level::{Level, ParentLink, SelectOption, SelectionMode};
pub use registry::{culture_filter_chain, orchard_chain, variety_chain, ChainRegistry};
pub use selection::Selection;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
