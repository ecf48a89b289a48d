//! Parameter values and ordered parameter tables

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A single protocol parameter value.
///
/// The tag mirrors what the text grammar said: quoted text is always `Str`,
/// bare numeric tokens are `Int` or `Float`, bracketed lists are `Seq`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Str(String),
    Int(i64),
    Float(f64),
    Seq(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Numeric view of `Int` and `Float` values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Int(i) => Some(*i as f64),
            ParameterValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Str(s) => f.write_str(s),
            ParameterValue::Int(i) => write!(f, "{}", i),
            // Debug keeps the decimal point on whole floats (2.0, not 2)
            ParameterValue::Float(x) => write!(f, "{:?}", x),
            ParameterValue::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParameterValue::Str(s) => serializer.serialize_str(s),
            ParameterValue::Int(i) => serializer.serialize_i64(*i),
            ParameterValue::Float(x) => serializer.serialize_f64(*x),
            ParameterValue::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::Str(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::Str(s)
    }
}

impl From<i64> for ParameterValue {
    fn from(i: i64) -> Self {
        ParameterValue::Int(i)
    }
}

impl From<f64> for ParameterValue {
    fn from(x: f64) -> Self {
        ParameterValue::Float(x)
    }
}

impl From<Vec<ParameterValue>> for ParameterValue {
    fn from(items: Vec<ParameterValue>) -> Self {
        ParameterValue::Seq(items)
    }
}

/// Ordered map of canonical parameter names to values.
///
/// Entries keep document order. Inserting a name that is already present
/// replaces its value but keeps its original position (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    entries: Vec<(String, ParameterValue)>,
    index: HashMap<String, usize>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a parameter, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: ParameterValue,
    ) -> Option<ParameterValue> {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, ParameterValue)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (S, ParameterValue)>>(iter: I) -> Self {
        let mut table = ParameterTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

impl Serialize for ParameterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
