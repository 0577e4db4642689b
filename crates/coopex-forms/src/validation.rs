//! Client-side field validation
//!
//! Provides [`FieldRule`] and [`validate_record`], which reports every
//! violation of a payload in one pass.

use crate::error::{FieldViolation, ValidationErrors, ViolationKind};
use coopex_record::{Record, Value};

/// Expected shape of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text, optionally bounded in characters
    Text { max_len: Option<usize> },

    /// Whole number, optionally bounded below
    Integer { min: Option<f64> },

    /// Any number, optionally bounded below
    Decimal { min: Option<f64> },
}

/// Validation rule of one independent form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Field name in the payload
    pub field: String,

    /// Human-readable label
    pub label: String,

    /// Whether an empty value is rejected
    pub required: bool,

    /// Expected shape
    pub kind: FieldKind,
}

impl FieldRule {
    fn new(field: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            required: false,
            kind,
        }
    }

    /// Free-text field
    #[must_use]
    pub fn text(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, FieldKind::Text { max_len: None })
    }

    /// Whole-number field
    #[must_use]
    pub fn integer(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, FieldKind::Integer { min: None })
    }

    /// Decimal field
    #[must_use]
    pub fn decimal(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, FieldKind::Decimal { min: None })
    }

    /// Reject empty values
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bound text length (no effect on numeric fields)
    #[must_use]
    pub fn max_len(mut self, max: usize) -> Self {
        if let FieldKind::Text { max_len } = &mut self.kind {
            *max_len = Some(max);
        }
        self
    }

    /// Bound numbers below (no effect on text fields)
    #[must_use]
    pub fn min(mut self, bound: f64) -> Self {
        match &mut self.kind {
            FieldKind::Integer { min } | FieldKind::Decimal { min } => *min = Some(bound),
            FieldKind::Text { .. } => {}
        }
        self
    }

    /// Check one value against the rule
    #[must_use]
    pub fn check(&self, value: &Value) -> Option<ViolationKind> {
        if value.is_empty() {
            return self.required.then_some(ViolationKind::Required);
        }

        match &self.kind {
            FieldKind::Text { max_len } => {
                let max = (*max_len)?;
                (value.to_string().chars().count() > max).then_some(ViolationKind::TooLong { max })
            }
            FieldKind::Integer { min } => match value.as_number() {
                Some(n) if n.fract() != 0.0 => Some(ViolationKind::NotInteger),
                Some(n) => below(n, *min),
                None => Some(ViolationKind::NotInteger),
            },
            FieldKind::Decimal { min } => match value.as_number() {
                Some(n) => below(n, *min),
                None => Some(ViolationKind::NotNumber),
            },
        }
    }
}

fn below(n: f64, min: Option<f64>) -> Option<ViolationKind> {
    min.filter(|m| n < *m)
        .map(|min| ViolationKind::BelowMinimum { min })
}

/// Validate `record` against every rule
///
/// # Errors
/// Returns all violations, in rule order, when any rule fails
pub fn validate_record(rules: &[FieldRule], record: &Record) -> Result<(), ValidationErrors> {
    let violations: Vec<FieldViolation> = rules
        .iter()
        .filter_map(|rule| {
            rule.check(&record.value(&rule.field)).map(|kind| FieldViolation {
                field: rule.field.clone(),
                label: rule.label.clone(),
                kind,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field() {
        let rule = FieldRule::text("nompar", "Nom").required();
        assert_eq!(rule.check(&Value::Null), Some(ViolationKind::Required));
        assert_eq!(rule.check(&Value::text("  ")), Some(ViolationKind::Required));
        assert_eq!(rule.check(&Value::text("P1")), None);
        assert_eq!(FieldRule::text("x", "X").check(&Value::Null), None);
    }

    #[test]
    fn text_length() {
        let rule = FieldRule::text("refpar", "Reference").max_len(3);
        assert_eq!(rule.check(&Value::text("abc")), None);
        assert_eq!(
            rule.check(&Value::text("abcd")),
            Some(ViolationKind::TooLong { max: 3 })
        );
        assert_eq!(rule.check(&Value::text("éèà")), None);
    }

    #[test]
    fn integer_rules() {
        let rule = FieldRule::integer("nbrarbres", "Arbres").min(0.0);
        assert_eq!(rule.check(&Value::text("12")), None);
        assert_eq!(rule.check(&Value::from(1.5)), Some(ViolationKind::NotInteger));
        assert_eq!(rule.check(&Value::text("douze")), Some(ViolationKind::NotInteger));
        assert_eq!(
            rule.check(&Value::from(-1)),
            Some(ViolationKind::BelowMinimum { min: 0.0 })
        );
    }

    #[test]
    fn decimal_rules() {
        let rule = FieldRule::decimal("superficie", "Superficie").min(0.0);
        assert_eq!(rule.check(&Value::text("2.75")), None);
        assert_eq!(rule.check(&Value::text("n/a")), Some(ViolationKind::NotNumber));
    }

    #[test]
    fn validate_collects_all() {
        let rules = vec![
            FieldRule::text("refpar", "Reference").required(),
            FieldRule::decimal("superficie", "Superficie").required().min(0.0),
            FieldRule::text("nompar", "Nom"),
        ];
        let record = Record::new().with("superficie", -3);
        let err = validate_record(&rules, &record).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert_eq!(err.violations[0].field, "refpar");
        assert_eq!(
            err.for_field("superficie").unwrap().kind,
            ViolationKind::BelowMinimum { min: 0.0 }
        );

        let ok = Record::new().with("refpar", "P9").with("superficie", 1.2);
        assert!(validate_record(&rules, &ok).is_ok());
    }
}
