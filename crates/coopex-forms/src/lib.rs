//! Coopex Form Container
//!
//! Binds cascades and table views to the cooperative's backend: loading
//! option lists, validating payloads and submitting create/update requests.
//!
//! # Core Concepts
//!
//! - [`FormDefinition`]: Entity endpoint, key field, cascades and field rules
//! - [`FormSession`]: One mounted form (load, edit, validate, submit)
//! - [`OptionSource`] / [`RecordStore`]: Async backend seams
//! - [`MemoryBackend`] / [`RestClient`]: In-process and HTTP backends
//! - [`DashboardConfig`]: TOML configuration with environment overrides
//!
//! # Example
//!
//! ```rust
//! use coopex_forms::{screens, FormSession, MemoryBackend};
//! use coopex_record::Record;
//!
//! # tokio_test_block(async {
//! let backend = MemoryBackend::new()
//!     .with_table("producteurs", vec![Record::new().with("codpro", 7).with("nompro", "Sidi")])
//!     .with_table("vergers", Vec::new());
//!
//! let mut session = FormSession::new(screens::verger_form().unwrap());
//! assert!(session.mount(&backend).await.is_empty());
//!
//! session.set_field("refver", "V9");
//! session.set_field("nomver", "Verger Est");
//! session.select("owner", "producer", 7);
//! session.submit(&backend).await.unwrap();
//! assert_eq!(backend.records("vergers").len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod form;
mod rest;
pub mod screens;
mod source;
mod validation;

pub use config::{
    ApiConfig, DashboardConfig, LogConfig, TableConfig, ENV_API_URL, ENV_ITEMS_PER_PAGE, ENV_LOG,
};
pub use error::{
    ConfigError, FieldViolation, FormError, SourceError, ValidationErrors, ViolationKind,
};
pub use form::{CascadeBinding, FormDefinition, FormMode, FormSession, LoadFailure};
pub use rest::RestClient;
pub use source::{MemoryBackend, OptionSource, RecordStore};
pub use validation::{validate_record, FieldKind, FieldRule};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
