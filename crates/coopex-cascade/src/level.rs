//! Levels of a dependency chain and their options
//!
//! Provides [`Level`] (field-name configuration for one dropdown) and
//! [`SelectOption`] (one candidate entry built from an API record).

use coopex_record::{Record, Value};

/// How many values a level accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// One value at a time
    #[default]
    Single,

    /// Any number of values; children match any of them
    Multi,
}

/// Link from a child level to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent level
    pub level: String,

    /// Field on the child's records holding the parent identifier
    pub field: String,
}

/// One position in a dependency chain
///
/// # Examples
/// - culture: id `codcul`, label `nomcul`, no parent
/// - variety: id `codvar`, label `nomvar`, parent `culture` through `codcul`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    name: String,
    id_field: String,
    label_field: String,
    parent: Option<ParentLink>,
    record_field: String,
    mode: SelectionMode,
}

impl Level {
    /// Create a root level
    #[must_use]
    pub fn root(
        name: impl Into<String>,
        id_field: impl Into<String>,
        label_field: impl Into<String>,
    ) -> Self {
        let id_field = id_field.into();
        Self {
            name: name.into(),
            record_field: id_field.clone(),
            id_field,
            label_field: label_field.into(),
            parent: None,
            mode: SelectionMode::Single,
        }
    }

    /// Create a level filtered by `parent`
    ///
    /// `parent_field` names the field on this level's records that holds
    /// the parent's identifier.
    #[must_use]
    pub fn child(
        name: impl Into<String>,
        id_field: impl Into<String>,
        label_field: impl Into<String>,
        parent: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        let mut level = Self::root(name, id_field, label_field);
        level.parent = Some(ParentLink {
            level: parent.into(),
            field: parent_field.into(),
        });
        level
    }

    /// Use a different field name on edited entities
    #[inline]
    #[must_use]
    pub fn with_record_field(mut self, field: impl Into<String>) -> Self {
        self.record_field = field.into();
        self
    }

    /// Accept several values
    #[inline]
    #[must_use]
    pub fn multi(mut self) -> Self {
        self.mode = SelectionMode::Multi;
        self
    }

    /// Level name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier field on option records
    #[inline]
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Display field on option records
    #[inline]
    #[must_use]
    pub fn label_field(&self) -> &str {
        &self.label_field
    }

    /// Parent link, `None` for root levels
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// Field holding this level's value on edited entities
    #[inline]
    #[must_use]
    pub fn record_field(&self) -> &str {
        &self.record_field
    }

    /// Selection mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Build an option from an API record
    ///
    /// Missing fields become `Null`; a missing label falls back to the
    /// identifier text.
    #[must_use]
    pub fn option_from(&self, record: &Record) -> SelectOption {
        let value = record.value(&self.id_field);
        let label = match record.get(&self.label_field) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => value.to_string(),
        };
        let parent = self
            .parent
            .as_ref()
            .map(|link| record.value(&link.field))
            .filter(|v| !v.is_empty());

        SelectOption {
            value,
            label,
            parent,
            record: record.clone(),
        }
    }
}

/// One selectable entry of a level
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// Identifier
    pub value: Value,

    /// Display text
    pub label: String,

    /// Identifier of the owning parent option, `None` at root levels
    pub parent: Option<Value>,

    /// Record the option was built from
    pub record: Record,
}

impl SelectOption {
    /// Check if option identifier matches `value`
    #[inline]
    #[must_use]
    pub fn is(&self, value: &Value) -> bool {
        self.value.tolerant_eq(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_level_defaults() {
        let level = Level::root("culture", "codcul", "nomcul");
        assert_eq!(level.record_field(), "codcul");
        assert_eq!(level.mode(), SelectionMode::Single);
        assert!(level.parent().is_none());
    }

    #[test]
    fn child_level_link() {
        let level = Level::child("variety", "codvar", "nomvar", "culture", "codcul")
            .with_record_field("numvar")
            .multi();
        let link = level.parent().unwrap();
        assert_eq!(link.level, "culture");
        assert_eq!(link.field, "codcul");
        assert_eq!(level.record_field(), "numvar");
        assert_eq!(level.mode(), SelectionMode::Multi);
    }

    #[test]
    fn option_from_record() {
        let level = Level::child("variety", "codvar", "nomvar", "culture", "codcul");
        let record = Record::new()
            .with("codvar", 10)
            .with("codcul", "1")
            .with("nomvar", "Orange");
        let option = level.option_from(&record);
        assert!(option.is(&Value::text("10")));
        assert_eq!(option.label, "Orange");
        assert!(option.parent.unwrap().tolerant_eq(&Value::from(1)));
    }

    #[test]
    fn option_without_parent_or_label() {
        let level = Level::child("variety", "codvar", "nomvar", "culture", "codcul");
        let option = level.option_from(&Record::new().with("codvar", 7));
        assert_eq!(option.label, "7");
        assert!(option.parent.is_none());
    }
}
