//! Flat records as returned by the API
//!
//! Provides [`Record`], an insertion-ordered field map. Every entity the
//! dashboard handles (cultures, varieties, orchards, export rows) arrives as
//! a flat JSON object and is kept in this shape.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flat record of named scalar fields
///
/// Field order is preserved so that payloads and printed rows follow the
/// order the API used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, returning the previous value
    #[inline]
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Get field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get field value, treating absent fields as `Null`
    #[inline]
    #[must_use]
    pub fn value(&self, field: &str) -> Value {
        self.0.get(field).cloned().unwrap_or_default()
    }

    /// Remove a field, preserving the order of the others
    #[inline]
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    /// Check if field is present
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Copy every field of `other` into this record
    pub fn merge(&mut self, other: &Record) {
        for (field, value) in other.iter() {
            self.0.insert(field.to_string(), value.clone());
        }
    }

    /// Field names in order
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(field, value)` pairs
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode a JSON array of objects
    ///
    /// # Errors
    /// Returns error if the text is not JSON, not an array, or contains a
    /// non-object element
    pub fn list_from_json(text: &str) -> Result<Vec<Record>, RecordError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::list_from_value(json)
    }

    /// Decode an already parsed JSON array of objects
    ///
    /// # Errors
    /// Returns error if the value is not an array of objects
    pub fn list_from_value(json: serde_json::Value) -> Result<Vec<Record>, RecordError> {
        let serde_json::Value::Array(items) = json else {
            return Err(RecordError::NotAnArray);
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Self::from_value(item).map_err(|_| RecordError::NotAnObject { index }))
            .collect()
    }

    /// Decode a single JSON object
    ///
    /// # Errors
    /// Returns error if the value is not an object
    pub fn from_value(json: serde_json::Value) -> Result<Record, RecordError> {
        match json {
            serde_json::Value::Object(map) => Ok(Self(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
            _ => Err(RecordError::NotAnObject { index: 0 }),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors decoding records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Malformed JSON text
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is not an array
    #[error("expected a json array of records")]
    NotAnArray,

    /// Element is not an object
    #[error("element {index} is not a json object")]
    NotAnObject { index: usize },
}
