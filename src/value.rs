//! Typed values stored in evaluation contexts.

use crate::error::ScoringError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Discriminant of a [`Value`], used in type mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Real,
    Boolean,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Real => write!(f, "real"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Text => write!(f, "text"),
        }
    }
}

/// A real, boolean or text value.
///
/// Reading a value as a variant it does not hold fails with
/// [`ScoringError::TypeMismatch`]; there is no coercion between variants.
///
/// # Examples
///
/// ```
/// use u_scorecard::Value;
///
/// let v = Value::from(62.5);
/// assert_eq!(v.as_real().unwrap(), 62.5);
/// assert!(v.as_boolean().is_err());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    /// Returns which variant this value holds.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Real(_) => ValueKind::Real,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    pub fn as_real(&self) -> Result<f64, ScoringError> {
        match self {
            Value::Real(r) => Ok(*r),
            other => Err(ScoringError::type_mismatch(ValueKind::Real, other.kind())),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, ScoringError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(ScoringError::type_mismatch(
                ValueKind::Boolean,
                other.kind(),
            )),
        }
    }

    pub fn as_text(&self) -> Result<&str, ScoringError> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(ScoringError::type_mismatch(ValueKind::Text, other.kind())),
        }
    }
}

// Reals compare by bit pattern so that `Eq` and `Hash` agree, NaN included.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Real(r) => r.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(r) => write!(f, "{r}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reads_matching_variant() {
        assert!((Value::Real(-21.4).as_real().unwrap() + 21.4).abs() < 1e-12);
        assert!(Value::Boolean(true).as_boolean().unwrap());
        assert_eq!(Value::from("o").as_text().unwrap(), "o");
    }

    #[test]
    fn test_wrong_variant_is_type_mismatch() {
        let err = Value::Boolean(true).as_real().unwrap_err();
        assert_eq!(
            err,
            ScoringError::TypeMismatch {
                name: None,
                expected: ValueKind::Real,
                found: ValueKind::Boolean,
            }
        );
        assert!(Value::Real(1.0).as_text().is_err());
        assert!(Value::from("true").as_boolean().is_err());
    }

    #[test]
    fn test_no_coercion_between_variants() {
        assert_ne!(Value::Real(1.0), Value::Boolean(true));
        assert_ne!(Value::Real(1.0), Value::from("1"));
    }

    #[test]
    fn test_equality_and_hash_by_payload() {
        let mut set = HashSet::new();
        set.insert(Value::Real(4.0));
        set.insert(Value::Real(4.0));
        set.insert(Value::Real(f64::NAN));
        set.insert(Value::Real(f64::NAN));
        set.insert(Value::from("a"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Real(62.5).to_string(), "62.5");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }
}
