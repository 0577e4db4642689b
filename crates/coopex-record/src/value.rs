//! Normalized scalar values
//!
//! Provides [`Value`], the single scalar type used for identifiers, labels
//! and table cells. The API returns numeric codes either as JSON numbers or
//! as strings; [`Value::tolerant_eq`] treats both spellings as the same key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Scalar value of a record field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Absent or JSON `null`
    #[default]
    Null,

    /// Boolean flag
    Bool(bool),

    /// Numeric value (integers are stored exactly up to 2^53)
    Number(f64),

    /// Text value
    Text(String),
}

impl Value {
    /// Create text value
    #[inline]
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Numeric interpretation of the value
    ///
    /// Numbers are returned as-is when finite. Text is trimmed and parsed;
    /// only finite results count, so `"NaN"` and `"inf"` stay textual.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Check if value means "nothing selected"
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Exact integer interpretation, for identifiers beyond `f64` precision
    fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Number(n) => integral(*n).map(i128::from),
            Self::Text(s) => s.trim().parse::<i128>().ok(),
            _ => None,
        }
    }

    /// Identifier equality tolerant of string/number spelling
    ///
    /// Two values are equal when both parse as numbers with the same
    /// numeric value, otherwise when their display strings are equal.
    /// Integer spellings are compared exactly. `Null` is only equal to
    /// `Null`.
    #[must_use]
    pub fn tolerant_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            _ => {
                if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
                    return a == b;
                }
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => self.to_string() == other.to_string(),
                }
            }
        }
    }

    /// Ordering used by table sorts
    ///
    /// A total order in three ranks: empty values first, then numeric
    /// values by magnitude, then everything else by case-insensitive
    /// display string.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (SortKey::Empty, SortKey::Empty) => Ordering::Equal,
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(&b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn sort_key(&self) -> SortKey {
        if self.is_empty() {
            SortKey::Empty
        } else if let Some(n) = self.as_number() {
            SortKey::Number(n)
        } else {
            SortKey::Text(self.to_string().to_lowercase())
        }
    }
}

enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Integral representation of a float, if it has one
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(n: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= LIMIT {
        Some(n as i64)
    } else {
        None
    }
}

impl From<serde_json::Value> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .or_else(|| n.as_i64().map(|i| i as f64))
                .map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match integral(n) {
                Some(i) => Self::from(i),
                None => serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number),
            },
            Value::Text(s) => Self::String(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

value_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tolerant_eq_string_and_number() {
        assert!(Value::from(12).tolerant_eq(&Value::text("12")));
        assert!(Value::text(" 12 ").tolerant_eq(&Value::from(12)));
        assert!(Value::text("12.0").tolerant_eq(&Value::text("12")));
        assert!(!Value::from(12).tolerant_eq(&Value::from(13)));
    }

    #[test]
    fn tolerant_eq_falls_back_to_text() {
        assert!(Value::text("ABC").tolerant_eq(&Value::text("ABC")));
        assert!(!Value::text("ABC").tolerant_eq(&Value::text("abc")));
        assert!(!Value::text("12a").tolerant_eq(&Value::from(12)));
    }

    #[test]
    fn null_only_equals_null() {
        assert!(Value::Null.tolerant_eq(&Value::Null));
        assert!(!Value::Null.tolerant_eq(&Value::text("")));
        assert!(!Value::from(0).tolerant_eq(&Value::Null));
    }

    #[test]
    fn nan_text_is_not_numeric() {
        assert_eq!(Value::text("NaN").as_number(), None);
        assert_eq!(Value::text("inf").as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::text("   ").is_empty());
        assert!(!Value::from(0).is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn display_integral_numbers() {
        assert_eq!(Value::from(12).to_string(), "12");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn json_conversion() {
        let v: Value = serde_json::from_str("34").unwrap();
        assert_eq!(v, Value::Number(34.0));
        let v: Value = serde_json::from_str("\"34\"").unwrap();
        assert_eq!(v, Value::text("34"));
        let v: Value = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(v, Value::text("[1,2]"));
        assert_eq!(serde_json::to_string(&Value::from(34)).unwrap(), "34");
        assert_eq!(serde_json::to_string(&Value::Number(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn sort_cmp_numeric_and_text() {
        assert_eq!(Value::text("9").sort_cmp(&Value::from(10)), Ordering::Less);
        assert_eq!(
            Value::text("agrumes").sort_cmp(&Value::text("Pomme")),
            Ordering::Less
        );
        assert_eq!(Value::Null.sort_cmp(&Value::text("a")), Ordering::Less);
        assert_eq!(
            Value::text("Gala").sort_cmp(&Value::text("gala")),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_cmp_ranks_numbers_before_codes() {
        let (two, ten, code) = (Value::text("2"), Value::from(10), Value::text("1a"));
        assert_eq!(two.sort_cmp(&ten), Ordering::Less);
        assert_eq!(ten.sort_cmp(&code), Ordering::Less);
        assert_eq!(two.sort_cmp(&code), Ordering::Less);
        assert_eq!(Value::text("  ").sort_cmp(&Value::Null), Ordering::Equal);
        assert_eq!(Value::Null.sort_cmp(&two), Ordering::Less);
    }

    #[test]
    fn large_integer_identifiers_stay_distinct() {
        let a = Value::text("9007199254740993");
        let b = Value::text("9007199254740992");
        assert!(!a.tolerant_eq(&b));
        assert!(a.tolerant_eq(&Value::text(" 9007199254740993 ")));
        assert!(b.tolerant_eq(&Value::from(9_007_199_254_740_992_u64)));
    }

    proptest! {
        #[test]
        fn prop_integer_spellings_are_equal(n in -1_000_000i64..1_000_000) {
            let number = Value::from(n);
            let text = Value::text(n.to_string());
            prop_assert!(number.tolerant_eq(&text));
            prop_assert!(text.tolerant_eq(&number));
        }

        #[test]
        fn prop_sort_cmp_is_a_total_order(
            values in proptest::collection::vec(
                prop_oneof![
                    (0u32..200).prop_map(|k| Value::text(k.to_string())),
                    (0u32..200).prop_map(|k| Value::text(format!("{k}a"))),
                    (0u32..200).prop_map(Value::from),
                    Just(Value::Null),
                    Just(Value::text("")),
                ],
                0..60,
            )
        ) {
            let mut sorted = values.clone();
            sorted.sort_by(Value::sort_cmp);
            for pair in sorted.windows(2) {
                prop_assert_ne!(pair[0].sort_cmp(&pair[1]), Ordering::Greater);
            }
            for a in &values {
                for b in &values {
                    prop_assert_eq!(a.sort_cmp(b), b.sort_cmp(a).reverse());
                }
            }
        }

        #[test]
        fn prop_tolerant_eq_is_symmetric(a in "[0-9a-z ]{0,4}", b in "[0-9a-z ]{0,4}") {
            let (a, b) = (Value::text(a), Value::text(b));
            prop_assert_eq!(a.tolerant_eq(&b), b.tolerant_eq(&a));
        }
    }
}
