//! Dependency chains
//!
//! Provides [`CascadeChain`], an ordered set of [`Level`]s where every
//! level after the first may name an earlier level as its parent.

use crate::level::Level;
use std::collections::HashSet;

/// Validated dependency chain
///
/// Levels are stored in declaration order and every parent precedes its
/// children, so walking indices upward visits parents before children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeChain {
    levels: Vec<Level>,
    parents: Vec<Option<usize>>,
}

impl CascadeChain {
    /// Start building a chain
    #[inline]
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Assemble without validation
    ///
    /// Unknown parents are treated as roots.
    pub(crate) fn assemble(levels: Vec<Level>) -> Self {
        let parents = levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                level.parent().and_then(|link| {
                    levels[..i].iter().position(|l| l.name() == link.level)
                })
            })
            .collect();
        Self { levels, parents }
    }

    /// Check the structural rules of a chain
    ///
    /// # Errors
    /// - [`ChainError::Empty`] with no levels
    /// - [`ChainError::EmptyField`] for blank names or field names
    /// - [`ChainError::DuplicateLevel`] for repeated level names
    /// - [`ChainError::UnknownParent`] when a parent is not declared earlier
    pub fn validate(levels: &[Level]) -> Result<(), ChainError> {
        if levels.is_empty() {
            return Err(ChainError::Empty);
        }

        let mut seen = HashSet::new();
        for level in levels {
            let name = level.name();
            if name.trim().is_empty() {
                return Err(ChainError::EmptyField {
                    level: name.to_string(),
                    field: "name",
                });
            }
            for (field, value) in [
                ("id_field", level.id_field()),
                ("label_field", level.label_field()),
                ("record_field", level.record_field()),
            ] {
                if value.trim().is_empty() {
                    return Err(ChainError::EmptyField {
                        level: name.to_string(),
                        field,
                    });
                }
            }
            if let Some(link) = level.parent() {
                if link.field.trim().is_empty() {
                    return Err(ChainError::EmptyField {
                        level: name.to_string(),
                        field: "parent_field",
                    });
                }
                if !seen.contains(link.level.as_str()) {
                    return Err(ChainError::UnknownParent {
                        level: name.to_string(),
                        parent: link.level.clone(),
                    });
                }
            }
            if !seen.insert(name) {
                return Err(ChainError::DuplicateLevel(name.to_string()));
            }
        }

        Ok(())
    }

    /// Levels in declaration order
    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if chain has no levels
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`
    #[inline]
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Index of the level called `name`
    #[inline]
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.name() == name)
    }

    /// Parent index of the level at `index`
    #[inline]
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Check if `ancestor` is a strict ancestor of `index`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, index: usize) -> bool {
        let mut current = self.parent_of(index);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Strict descendants of `index`, nearest first
    #[must_use]
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        (index + 1..self.levels.len())
            .filter(|&d| self.is_ancestor(index, d))
            .collect()
    }
}

/// Builder for [`CascadeChain`]
#[derive(Debug, Default)]
pub struct ChainBuilder {
    levels: Vec<Level>,
}

impl ChainBuilder {
    /// Append a level
    #[inline]
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    /// Validate and build the chain
    ///
    /// # Errors
    /// Returns the first structural violation found by [`CascadeChain::validate`]
    pub fn build(self) -> Result<CascadeChain, ChainError> {
        CascadeChain::validate(&self.levels)?;
        Ok(CascadeChain::assemble(self.levels))
    }
}

/// Errors building a chain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// Chain without levels
    #[error("chain has no levels")]
    Empty,

    /// Level name used twice
    #[error("duplicate level: {0}")]
    DuplicateLevel(String),

    /// Parent not declared before the child
    #[error("level '{level}' refers to unknown parent '{parent}'")]
    UnknownParent { level: String, parent: String },

    /// Blank name or field name
    #[error("level '{level}' has an empty {field}")]
    EmptyField { level: String, field: &'static str },
}
