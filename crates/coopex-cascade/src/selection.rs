//! Selection state of a single level

use crate::level::SelectionMode;
use coopex_record::Value;
use smallvec::SmallVec;

/// Values chosen at one level
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Nothing chosen
    #[default]
    None,

    /// Single chosen value
    One(Value),

    /// Set of chosen values (multi-select levels)
    Many(SmallVec<[Value; 4]>),
}

impl Selection {
    /// Build a multi selection from values
    #[must_use]
    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    /// Check if nothing is chosen
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::One(v) => v.is_empty(),
            Self::Many(values) => values.is_empty(),
        }
    }

    /// Check if `value` is one of the chosen values
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values().iter().any(|v| v.tolerant_eq(value))
    }

    /// Chosen values as a slice
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::None => &[],
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(values) => values,
        }
    }

    /// The chosen value of a single selection
    #[must_use]
    pub fn single(&self) -> Option<&Value> {
        match self {
            Self::One(v) => Some(v),
            _ => None,
        }
    }

    /// Normalize to the shape a level of `mode` accepts
    ///
    /// Empty values are dropped, multi sets are de-duplicated with tolerant
    /// equality, a single level keeps the first of many values and a multi
    /// level wraps a single value.
    #[must_use]
    pub fn normalize(self, mode: SelectionMode) -> Self {
        let mut values: SmallVec<[Value; 4]> = SmallVec::new();
        for value in self.into_values() {
            if !value.is_empty() && !values.iter().any(|v| v.tolerant_eq(&value)) {
                values.push(value);
            }
        }

        match mode {
            SelectionMode::Single => values.into_iter().next().map_or(Self::None, Self::One),
            SelectionMode::Multi if values.is_empty() => Self::None,
            SelectionMode::Multi => Self::Many(values),
        }
    }

    fn into_values(self) -> SmallVec<[Value; 4]> {
        match self {
            Self::None => SmallVec::new(),
            Self::One(v) => smallvec::smallvec![v],
            Self::Many(values) => values,
        }
    }
}

impl From<Value> for Selection {
    fn from(value: Value) -> Self {
        if value.is_empty() {
            Self::None
        } else {
            Self::One(value)
        }
    }
}

impl From<Option<Value>> for Selection {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::None, Self::from)
    }
}
