//! Items that can be queried by attribute name.

use crate::error::ScoringError;
use crate::value::Value;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Anything queryable by attribute name for a [`Value`].
///
/// An unknown attribute is a normal outcome (`None`), not an error.
pub trait Evaluable {
    fn get(&self, name: &str) -> Option<Value>;
}

impl<E: Evaluable + ?Sized> Evaluable for &E {
    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }
}

impl<E: Evaluable + ?Sized> Evaluable for Box<E> {
    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }
}

impl Evaluable for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<Value> {
        HashMap::get(self, name).cloned()
    }
}

/// A single attribute/value pair.
///
/// Scores have reference identity: two scores with identical content are
/// distinct and compare unequal.
///
/// # Examples
///
/// ```
/// use u_scorecard::{Evaluable, Score, Value};
///
/// let score = Score::new("ch", Value::Real(5.0)).unwrap();
/// assert_eq!(score.get("ch"), Some(Value::Real(5.0)));
/// assert_eq!(score.get("other"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Score {
    attribute: String,
    value: Value,
}

impl Score {
    /// Creates a score. Fails if `attribute` is empty.
    pub fn new(attribute: impl Into<String>, value: Value) -> Result<Self, ScoringError> {
        let attribute = attribute.into();
        if attribute.is_empty() {
            return Err(ScoringError::MissingRequiredField("attribute"));
        }
        Ok(Self { attribute, value })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Evaluable for Score {
    fn get(&self, name: &str) -> Option<Value> {
        (name == self.attribute).then(|| self.value.clone())
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Score {}

impl Hash for Score {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

/// A structured record with any number of attributes.
///
/// # Examples
///
/// ```
/// use u_scorecard::{Evaluable, Record, Value};
///
/// let record = Record::new()
///     .with_attribute("x", 3.0)
///     .with_attribute("approved", true);
/// assert_eq!(record.get("x"), Some(Value::Real(3.0)));
/// assert_eq!(record.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    attributes: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl Evaluable for Record {
    fn get(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
