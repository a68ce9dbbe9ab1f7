//! Fact values.
//!
//! A fact value is a scalar, an ordered sequence, an insertion-ordered
//! mapping, or null. Mappings keep the order resolvers produced them in, so
//! output is stable from run to run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion-ordered mapping of fact value keys.
pub type FactMap = IndexMap<String, FactValue>;

/// A single fact value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<FactValue>),
    Map(FactMap),
}

/// One step when digging into a value: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FilterToken {
    Key(String),
    Index(usize),
}

impl FilterToken {
    /// Parses a query segment. All-digit segments address sequence elements.
    pub fn parse(segment: &str) -> Self {
        if !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = segment.parse()
        {
            return FilterToken::Index(index);
        }
        FilterToken::Key(segment.to_string())
    }

    /// Returns the token as a path segment for the fact collection.
    pub fn as_segment(&self) -> String {
        match self {
            FilterToken::Key(key) => key.clone(),
            FilterToken::Index(index) => index.to_string(),
        }
    }
}

impl FactValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FactValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FactValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FactMap> {
        match self {
            FactValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key in a mapping value.
    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Walks the value along `tokens`.
    ///
    /// Keys address mapping entries and indices address sequence elements.
    /// A mapping also accepts an index token as a key (`"0"`), matching how
    /// collection paths are spelled.
    pub fn dig(&self, tokens: &[FilterToken]) -> Option<&FactValue> {
        let mut current = self;
        for token in tokens {
            current = match (current, token) {
                (FactValue::Map(map), FilterToken::Key(key)) => map.get(key)?,
                (FactValue::Map(map), FilterToken::Index(index)) => map.get(&index.to_string())?,
                (FactValue::Array(items), FilterToken::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FactValue::Null => "null",
            FactValue::Bool(_) => "boolean",
            FactValue::Integer(_) => "integer",
            FactValue::Float(_) => "float",
            FactValue::String(_) => "string",
            FactValue::Array(_) => "array",
            FactValue::Map(_) => "mapping",
        }
    }
}

impl fmt::Display for FactValue {
    /// Plain rendering: strings unquoted, containers in a compact
    /// `key => value` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Null => Ok(()),
            FactValue::Bool(b) => write!(f, "{}", b),
            FactValue::Integer(i) => write!(f, "{}", i),
            FactValue::Float(x) => write!(f, "{}", x),
            FactValue::String(s) => f.write_str(s),
            FactValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_nested(f, item)?;
                }
                f.write_str("]")
            }
            FactValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} => ", key)?;
                    write_nested(f, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, value: &FactValue) -> fmt::Result {
    match value {
        FactValue::String(s) => write!(f, "\"{}\"", s),
        FactValue::Null => f.write_str("null"),
        other => write!(f, "{}", other),
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::String(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::String(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Integer(value)
    }
}

impl From<u32> for FactValue {
    fn from(value: u32) -> Self {
        FactValue::Integer(i64::from(value))
    }
}

impl From<usize> for FactValue {
    fn from(value: usize) -> Self {
        FactValue::from(value as u64)
    }
}

impl From<u64> for FactValue {
    /// Values beyond `i64::MAX` degrade to floats rather than wrapping.
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => FactValue::Integer(i),
            Err(_) => FactValue::Float(value as f64),
        }
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Float(value)
    }
}

impl From<FactMap> for FactValue {
    fn from(value: FactMap) -> Self {
        FactValue::Map(value)
    }
}

impl<T: Into<FactValue>> From<Vec<T>> for FactValue {
    fn from(value: Vec<T>) -> Self {
        FactValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FactValue>> From<Option<T>> for FactValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FactValue::Null, Into::into)
    }
}
