//! Backend seams
//!
//! Provides the [`OptionSource`] (full candidate lists) and [`RecordStore`]
//! (writes) traits, and [`MemoryBackend`], an in-process implementation of
//! both used for fixtures and tests.

use crate::error::SourceError;
use async_trait::async_trait;
use coopex_record::{Record, Value};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Supplier of unfiltered option lists
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Every record of `endpoint`
    async fn fetch_all(&self, endpoint: &str) -> Result<Vec<Record>, SourceError>;
}

/// Destination of form submissions
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record, returning what the backend stored
    async fn create(&self, endpoint: &str, record: &Record) -> Result<Record, SourceError>;

    /// Replace the record whose `key_field` equals `key`
    async fn update(
        &self,
        endpoint: &str,
        key_field: &str,
        key: &Value,
        record: &Record,
    ) -> Result<Record, SourceError>;

    /// Check if a record with this key exists
    async fn exists(&self, endpoint: &str, key_field: &str, key: &Value) -> Result<bool, SourceError>;
}

/// In-memory backend keyed by endpoint
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    unavailable: RwLock<HashSet<String>>,
}

impl MemoryBackend {
    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table insert
    #[must_use]
    pub fn with_table(self, endpoint: &str, records: Vec<Record>) -> Self {
        self.tables.write().insert(endpoint.to_string(), records);
        self
    }

    /// Build from a JSON object mapping endpoints to record arrays
    ///
    /// # Errors
    /// Returns error if the value is not an object of record arrays
    pub fn from_json(json: serde_json::Value) -> Result<Self, SourceError> {
        let serde_json::Value::Object(map) = json else {
            return Err(SourceError::Decode {
                endpoint: "<fixture>".to_string(),
                source: coopex_record::RecordError::NotAnArray,
            });
        };
        let mut tables = HashMap::with_capacity(map.len());
        for (endpoint, list) in map {
            let records = Record::list_from_value(list).map_err(|source| SourceError::Decode {
                endpoint: endpoint.clone(),
                source,
            })?;
            tables.insert(endpoint, records);
        }
        Ok(Self {
            tables: RwLock::new(tables),
            unavailable: RwLock::default(),
        })
    }

    /// Read a JSON fixture file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or has the wrong shape
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| SourceError::Decode {
                endpoint: path.display().to_string(),
                source: e.into(),
            })?;
        Self::from_json(json)
    }

    /// Simulate an outage of `endpoint`
    pub fn set_unavailable(&self, endpoint: &str, unavailable: bool) {
        let mut set = self.unavailable.write();
        if unavailable {
            set.insert(endpoint.to_string());
        } else {
            set.remove(endpoint);
        }
    }

    /// Snapshot of an endpoint's records
    #[must_use]
    pub fn records(&self, endpoint: &str) -> Vec<Record> {
        self.tables.read().get(endpoint).cloned().unwrap_or_default()
    }

    /// Endpoint names, sorted
    #[must_use]
    pub fn endpoints(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn check(&self, endpoint: &str) -> Result<(), SourceError> {
        if self.unavailable.read().contains(endpoint) {
            return Err(SourceError::Unavailable(endpoint.to_string()));
        }
        if !self.tables.read().contains_key(endpoint) {
            return Err(SourceError::UnknownEndpoint(endpoint.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OptionSource for MemoryBackend {
    async fn fetch_all(&self, endpoint: &str) -> Result<Vec<Record>, SourceError> {
        self.check(endpoint)?;
        Ok(self.records(endpoint))
    }
}

#[async_trait]
impl RecordStore for MemoryBackend {
    async fn create(&self, endpoint: &str, record: &Record) -> Result<Record, SourceError> {
        self.check(endpoint)?;
        let mut tables = self.tables.write();
        tables
            .entry(endpoint.to_string())
            .or_default()
            .push(record.clone());
        Ok(record.clone())
    }

    async fn update(
        &self,
        endpoint: &str,
        key_field: &str,
        key: &Value,
        record: &Record,
    ) -> Result<Record, SourceError> {
        self.check(endpoint)?;
        let mut tables = self.tables.write();
        let existing = tables
            .get_mut(endpoint)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get(key_field).is_some_and(|v| v.tolerant_eq(key)))
            })
            .ok_or_else(|| SourceError::NotFound {
                endpoint: endpoint.to_string(),
                key: key.to_string(),
            })?;
        existing.merge(record);
        Ok(existing.clone())
    }

    async fn exists(&self, endpoint: &str, key_field: &str, key: &Value) -> Result<bool, SourceError> {
        self.check(endpoint)?;
        Ok(self
            .tables
            .read()
            .get(endpoint)
            .is_some_and(|rows| rows.iter().any(|row| row.get(key_field).is_some_and(|v| v.tolerant_eq(key)))))
    }
}
