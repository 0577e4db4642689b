//! Error types for the form container
//!
//! Provides error handling for:
//! - Option and record backends (network, status, decoding)
//! - Client-side field validation
//! - Submission (duplicate keys, backend failures)
//! - Configuration loading

use coopex_record::RecordError;
use std::path::PathBuf;

/// Errors from an option source or record store
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure
    #[error("request to '{endpoint}' failed: {message}")]
    Request { endpoint: String, message: String },

    /// Non-success HTTP status
    #[error("'{endpoint}' answered with status {status}")]
    Status { endpoint: String, status: u16 },

    /// Response body is not a list of records
    #[error("invalid payload from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: RecordError,
    },

    /// Endpoint not served by the backend
    #[error("unknown endpoint: '{0}'")]
    UnknownEndpoint(String),

    /// Endpoint marked unavailable
    #[error("endpoint '{0}' is unavailable")]
    Unavailable(String),

    /// Base URL cannot carry path segments
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// Fixture file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record to update does not exist
    #[error("no record in '{endpoint}' with key {key}")]
    NotFound { endpoint: String, key: String },
}

impl SourceError {
    /// Create request error for endpoint
    pub fn request(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Check if retrying the same call could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Unavailable(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Reason a field failed validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViolationKind {
    /// Required field left empty
    #[error("is required")]
    Required,

    /// Not a whole number
    #[error("must be a whole number")]
    NotInteger,

    /// Not a number
    #[error("must be a number")]
    NotNumber,

    /// Number below the allowed minimum
    #[error("must be at least {min}")]
    BelowMinimum { min: f64 },

    /// Text longer than allowed
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
}

/// One invalid field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{label} {kind}")]
pub struct FieldViolation {
    /// Field name in the payload
    pub field: String,

    /// Human-readable field label
    pub label: String,

    /// What is wrong
    pub kind: ViolationKind,
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} invalid field(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationErrors {
    /// Violations in field order
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Violation for `field`, if any
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors submitting a form
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Client-side validation failed
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Create would overwrite an existing record
    #[error("a record in '{entity}' with {key_field} = {key} already exists")]
    DuplicateKey {
        entity: String,
        key_field: String,
        key: String,
    },

    /// Backend call failed
    #[error("backend error: {0}")]
    Source(#[from] SourceError),
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override could not be parsed
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display() {
        let err = ValidationErrors {
            violations: vec![
                FieldViolation {
                    field: "refpar".to_string(),
                    label: "Reference".to_string(),
                    kind: ViolationKind::Required,
                },
                FieldViolation {
                    field: "superficie".to_string(),
                    label: "Superficie".to_string(),
                    kind: ViolationKind::BelowMinimum { min: 0.0 },
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 invalid field(s): Reference is required; Superficie must be at least 0"
        );
        assert!(err.for_field("superficie").is_some());
        assert!(err.for_field("nompar").is_none());
    }

    #[test]
    fn transient_errors() {
        assert!(SourceError::request("cultures", "timeout").is_transient());
        assert!(SourceError::Status {
            endpoint: "cultures".to_string(),
            status: 503
        }
        .is_transient());
        assert!(!SourceError::UnknownEndpoint("x".to_string()).is_transient());
    }

    #[test]
    fn form_error_conversions() {
        let err: FormError = SourceError::Unavailable("vergers".to_string()).into();
        assert!(matches!(err, FormError::Source(_)));
        assert_eq!(err.to_string(), "backend error: endpoint 'vergers' is unavailable");
    }
}
