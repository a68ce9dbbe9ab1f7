//! Query parsing.
//!
//! Turns user query strings into `SearchedFact`s against the loaded entries.
//! A query is split on `.` and matched by its longest token prefix that
//! names something:
//!
//! ```text
//!   "os.release.major"
//!     try "os.release.major"  -> nothing registered
//!     try "os.release"        -> os.release          filter_tokens: [major]
//!
//!   "os"                      -> os.name, os.family, os.release, ...
//!   "blockdevice_sda_size"    -> blockdevice_.*_size (wildcard family)
//! ```
//!
//! A query ending in `.*` is kept whole.

use crate::fact::{FactKind, SearchedFact};
use crate::registry::{FactDefinition, FactName};
use crate::value::FilterToken;
use std::sync::Arc;
use tracing::debug;

pub struct QueryParser<'a> {
    entries: &'a [FactDefinition],
}

impl<'a> QueryParser<'a> {
    pub fn new(entries: &'a [FactDefinition]) -> Self {
        Self { entries }
    }

    /// Parses queries in order. An empty query list enumerates every entry
    /// in registry order.
    pub fn parse<S: AsRef<str>>(&self, queries: &[S]) -> Vec<SearchedFact> {
        if queries.is_empty() {
            return self.entries.iter().map(|e| searched(e, None, &[])).collect();
        }

        let mut searched_facts = Vec::new();
        for query in queries {
            searched_facts.extend(self.parse_query(query.as_ref()));
        }
        searched_facts
    }

    fn parse_query(&self, query: &str) -> Vec<SearchedFact> {
        let tokens: Vec<&str> = if query.ends_with(".*") {
            vec![query]
        } else {
            query.split('.').collect()
        };

        for len in (1..=tokens.len()).rev() {
            let candidate = tokens[..len].join(".");
            let filter_tokens: Vec<FilterToken> =
                tokens[len..].iter().map(|t| FilterToken::parse(t)).collect();

            let found: Vec<SearchedFact> = self
                .entries
                .iter()
                .filter(|e| name_matches(&e.name, &candidate))
                .map(|e| searched(e, Some(query), &filter_tokens))
                .collect();

            if !found.is_empty() {
                debug!("Query {} matched {} facts", query, found.len());
                return found;
            }
        }

        debug!("Query {} matched no fact", query);
        vec![SearchedFact {
            name: FactName::Literal(query.to_string()),
            user_query: Some(query.to_string()),
            kind: FactKind::Core,
            filter_tokens: Vec::new(),
            probe: None,
        }]
    }
}

fn name_matches(name: &FactName, candidate: &str) -> bool {
    match name {
        FactName::Literal(literal) => {
            literal == candidate
                || literal
                    .strip_prefix(candidate)
                    .is_some_and(|rest| rest.starts_with('.'))
        }
        FactName::Pattern(pattern) => !candidate.contains('.') && pattern.matches(candidate),
    }
}

fn searched(
    entry: &FactDefinition,
    query: Option<&str>,
    filter_tokens: &[FilterToken],
) -> SearchedFact {
    SearchedFact {
        name: entry.name.clone(),
        user_query: query.map(str::to_string),
        kind: entry.kind,
        filter_tokens: filter_tokens.to_vec(),
        probe: Some(Arc::clone(&entry.probe)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::fact::ResolvedFact;
    use crate::probe::Probe;
    use crate::registry::FactRegistry;

    fn entries() -> Vec<FactDefinition> {
        let probe: Arc<dyn Probe> =
            Arc::new(|_: Option<&str>| -> Result<Vec<ResolvedFact>, ProbeError> { Ok(Vec::new()) });
        let mut registry = FactRegistry::new();
        registry
            .register(
                "disks",
                Arc::clone(&probe),
                &["blockdevices", "blockdevice_.*_size", "blockdevice_.*_vendor"],
            )
            .unwrap();
        registry
            .register("os.name", Arc::clone(&probe), &["operatingsystem"])
            .unwrap();
        registry.register("os.release", Arc::clone(&probe), &[]).unwrap();
        registry.register("os.distro.codename", probe, &[]).unwrap();
        registry.with_legacy().cloned().collect()
    }

    fn names(facts: &[SearchedFact]) -> Vec<&str> {
        facts.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_enumerate_in_registry_order() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse::<&str>(&[]);
        assert_eq!(facts.len(), entries.len());
        assert_eq!(facts[0].name.as_str(), "disks");
        assert!(facts.iter().all(|f| f.user_query.is_none() && !f.is_unknown()));
    }

    #[test]
    fn test_exact_name() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["blockdevices"]);
        assert_eq!(names(&facts), vec!["blockdevices"]);
        assert_eq!(facts[0].kind, FactKind::Legacy);
        assert_eq!(facts[0].user_query.as_deref(), Some("blockdevices"));
    }

    #[test]
    fn test_prefix_selects_subtree() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["os"]);
        assert_eq!(names(&facts), vec!["os.name", "os.release", "os.distro.codename"]);
        assert!(facts.iter().all(|f| f.filter_tokens.is_empty()));
    }

    #[test]
    fn test_partial_segment_falls_back_to_shorter_prefix() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["os.rel"]);
        assert_eq!(names(&facts), vec!["os.name", "os.release", "os.distro.codename"]);
        assert!(
            facts
                .iter()
                .all(|f| f.filter_tokens == vec![FilterToken::Key("rel".into())])
        );
        assert!(facts.iter().all(|f| !f.is_unknown()));
    }

    #[test]
    fn test_trailing_tokens_become_filters() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["os.release.major"]);
        assert_eq!(names(&facts), vec!["os.release"]);
        assert_eq!(facts[0].filter_tokens, vec![FilterToken::parse("major")]);

        let facts = QueryParser::new(&entries).parse(&["disks.sda.size_bytes"]);
        assert_eq!(names(&facts), vec!["disks"]);
        assert_eq!(facts[0].filter_tokens.len(), 2);
    }

    #[test]
    fn test_wildcard_family() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["blockdevice_sda_size"]);
        assert_eq!(names(&facts), vec!["blockdevice_.*_size"]);
        assert_eq!(facts[0].filter_criteria(), Some("sda"));
    }

    #[test]
    fn test_unknown_query() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["no_such_fact", "os.name"]);
        assert_eq!(names(&facts), vec!["no_such_fact", "os.name"]);
        assert!(facts[0].is_unknown());
        assert_eq!(facts[0].kind, FactKind::Core);
        assert!(!facts[1].is_unknown());
    }

    #[test]
    fn test_trailing_wildcard_query_is_one_token() {
        let entries = entries();
        let facts = QueryParser::new(&entries).parse(&["os.*"]);
        assert!(facts[0].is_unknown());
        assert_eq!(facts[0].name.as_str(), "os.*");
    }
}
