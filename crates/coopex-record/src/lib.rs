//! Coopex Record Model
//!
//! Scalar values and flat records shared by the selection and table crates.
//!
//! # Core Concepts
//!
//! - [`Value`]: Normalized scalar with identifier equality tolerant of
//!   string/number spelling
//! - [`Record`]: Insertion-ordered flat field map, the shape of every API row
//!
//! # Example
//!
//! ```rust
//! use coopex_record::{Record, Value};
//!
//! let variety = Record::new().with("codvar", "20").with("nomvar", "Gala");
//! assert!(variety.value("codvar").tolerant_eq(&Value::from(20)));
//! ```

#![warn(unreachable_pub)]

mod record;
mod value;

pub use record::{Record, RecordError};
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
