//! Searched and resolved facts.

use crate::probe::Probe;
use crate::registry::FactName;
use crate::value::{FactValue, FilterToken};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Naming generation of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    /// Structured, dotted-path name.
    Core,
    /// Flat alias kept for backward compatibility.
    Legacy,
}

/// A request to resolve one fact during a run.
#[derive(Clone)]
pub struct SearchedFact {
    /// Registered name (literal or alias pattern), or the raw query for
    /// unknown facts.
    pub name: FactName,
    /// Exact query string the caller used; `None` in enumeration mode.
    pub user_query: Option<String>,
    pub kind: FactKind,
    /// Query segments past the registered name, used to dig into the value.
    pub filter_tokens: Vec<FilterToken>,
    /// `None` when the query matched no registry entry.
    pub probe: Option<Arc<dyn Probe>>,
}

impl SearchedFact {
    /// Returns true when the query matched nothing in the registry.
    pub fn is_unknown(&self) -> bool {
        self.probe.is_none()
    }

    /// Entity filter for wildcard aliases: the user query with the pattern's
    /// prefix and suffix lengths trimmed off.
    pub fn filter_criteria(&self) -> Option<&str> {
        match (&self.name, &self.user_query) {
            (FactName::Pattern(pattern), Some(query)) => pattern.extract(query),
            _ => None,
        }
    }
}

impl fmt::Debug for SearchedFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchedFact")
            .field("name", &self.name)
            .field("user_query", &self.user_query)
            .field("kind", &self.kind)
            .field("filter_tokens", &self.filter_tokens)
            .field("unknown", &self.is_unknown())
            .finish()
    }
}

/// A produced fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFact {
    pub name: String,
    pub value: FactValue,
    pub kind: FactKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_tokens: Vec<FilterToken>,
    /// Set under strict mode for queries that matched no registered fact.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unresolved: bool,
}

impl ResolvedFact {
    pub fn new(name: impl Into<String>, value: impl Into<FactValue>, kind: FactKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
            user_query: None,
            filter_tokens: Vec::new(),
            unresolved: false,
        }
    }

    pub fn core(name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(name, value, FactKind::Core)
    }

    pub fn legacy(name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(name, value, FactKind::Legacy)
    }

    /// Null fact standing in for something that produced no value.
    pub fn null(name: impl Into<String>, kind: FactKind) -> Self {
        Self::new(name, FactValue::Null, kind)
    }

    /// Copies the query context of the fact that asked for this one.
    pub fn answering(mut self, searched: &SearchedFact) -> Self {
        self.user_query = searched.user_query.clone();
        self.filter_tokens = searched.filter_tokens.clone();
        self
    }

    pub fn is_legacy(&self) -> bool {
        self.kind == FactKind::Legacy
    }
}
