//! Fact names and wildcard alias patterns.
//!
//! A legacy alias such as `blockdevice_.*_size` stands for a family of names,
//! one per entity a probe discovers at runtime (`blockdevice_sda_size`,
//! `blockdevice_sdb_size`, ...). The pattern holds exactly one wildcard
//! marker; the text before it is the prefix, the text after it the suffix.
//!
//! The entity key is recovered from a concrete name by trimming exactly
//! `prefix.len()` bytes from the front and `suffix.len()` bytes from the back.
//! The trim does not search for the prefix or suffix text inside the entity
//! name, so `blockdevice_x_size_size` against `blockdevice_.*_size` yields
//! `x_size`.

use crate::error::FacterError;
use std::fmt;

/// The wildcard marker inside alias patterns.
pub const WILDCARD: &str = ".*";

/// Alias pattern with a single wildcard placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasPattern {
    raw: String,
    prefix_len: usize,
    suffix_len: usize,
}

impl AliasPattern {
    /// Parses a pattern. It must contain exactly one wildcard marker.
    pub fn parse(raw: &str) -> Result<Self, FacterError> {
        let invalid = |reason: &str| FacterError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = raw.split(WILDCARD);
        let prefix = parts.next().unwrap_or_default();
        let Some(suffix) = parts.next() else {
            return Err(invalid("no wildcard marker"));
        };
        if parts.next().is_some() {
            return Err(invalid("more than one wildcard marker"));
        }
        if prefix.is_empty() && suffix.is_empty() {
            return Err(invalid("pattern matches every name"));
        }

        Ok(Self {
            raw: raw.to_string(),
            prefix_len: prefix.len(),
            suffix_len: suffix.len(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.raw[..self.prefix_len]
    }

    pub fn suffix(&self) -> &str {
        &self.raw[self.raw.len() - self.suffix_len..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true when the whole of `name` matches the pattern.
    /// The wildcard may stand for an empty string.
    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix_len + self.suffix_len
            && name.starts_with(self.prefix())
            && name.ends_with(self.suffix())
    }

    /// Extracts the entity key from a name by fixed-length trimming.
    ///
    /// Returns `None` when `name` is shorter than prefix and suffix combined
    /// or the cut would split a UTF-8 character.
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        let end = name.len().checked_sub(self.suffix_len)?;
        if end < self.prefix_len {
            return None;
        }
        name.get(self.prefix_len..end)
    }

    /// Builds the concrete name for one entity.
    pub fn expand(&self, entity: &str) -> String {
        format!("{}{}{}", self.prefix(), entity, self.suffix())
    }
}

impl fmt::Display for AliasPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Name of a registry entry: a literal name or an alias pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactName {
    Literal(String),
    Pattern(AliasPattern),
}

impl FactName {
    /// Parses a registered name; names containing the wildcard marker become
    /// patterns.
    pub fn parse(raw: &str) -> Result<Self, FacterError> {
        if raw.is_empty() {
            return Err(FacterError::InvalidPattern {
                pattern: String::new(),
                reason: "empty fact name".to_string(),
            });
        }
        if raw.contains(WILDCARD) {
            AliasPattern::parse(raw).map(FactName::Pattern)
        } else {
            Ok(FactName::Literal(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FactName::Literal(name) => name,
            FactName::Pattern(pattern) => pattern.as_str(),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, FactName::Pattern(_))
    }

    /// Returns true when a concrete fact name belongs to this entry.
    pub fn covers(&self, name: &str) -> bool {
        match self {
            FactName::Literal(literal) => literal == name,
            FactName::Pattern(pattern) => pattern.matches(name),
        }
    }
}

impl fmt::Display for FactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
