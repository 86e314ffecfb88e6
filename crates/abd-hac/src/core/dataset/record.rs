//! Items with mixed numeric and categorical attributes.

use serde::{Deserialize, Serialize};

/// A single attribute of a `Record`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// A real-valued attribute.
    Numeric(f64),
    /// A categorical attribute.
    Categorical(String),
}

impl Attribute {
    /// Returns the value of a numeric attribute.
    #[must_use]
    pub const fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            Self::Categorical(_) => None,
        }
    }

    /// Returns the label of a categorical attribute.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Categorical(c) => Some(c),
        }
    }
}

impl From<f64> for Attribute {
    fn from(v: f64) -> Self {
        Self::Numeric(v)
    }
}

impl From<&str> for Attribute {
    fn from(c: &str) -> Self {
        Self::Categorical(c.to_string())
    }
}

impl From<String> for Attribute {
    fn from(c: String) -> Self {
        Self::Categorical(c)
    }
}

/// An item with a fixed-width list of mixed numeric and categorical
/// attributes.
///
/// The distance functions decide how to use the attributes; the provided
/// metrics only look at the positions where both records are numeric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record(Vec<Attribute>);

impl Record {
    /// Creates a new `Record` from its attributes.
    #[must_use]
    pub const fn new(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }

    /// Returns the attributes of the record.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.0
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the pairs of values at the positions where both records hold a
    /// numeric attribute.
    pub fn numeric_pairs<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter_map(|(a, b)| a.as_numeric().zip(b.as_numeric()))
    }
}

impl From<Vec<Attribute>> for Record {
    fn from(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }
}

impl FromIterator<Attribute> for Record {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
