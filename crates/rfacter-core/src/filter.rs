//! Final visibility rules applied to augmented facts.

use crate::fact::{ResolvedFact, SearchedFact};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::collections::HashSet;
use tracing::{debug, error};

pub struct FactFilter {
    strict: bool,
    legacy_visible: bool,
}

impl FactFilter {
    pub fn new(strict: bool, legacy_visible: bool) -> Self {
        Self {
            strict,
            legacy_visible,
        }
    }

    /// Drops hidden legacy facts, digs query filters into values, flags
    /// unknown queries and removes duplicates.
    pub fn filter(&self, searched: &[SearchedFact], facts: Vec<ResolvedFact>) -> Vec<ResolvedFact> {
        let unknown: HashSet<&str> = searched
            .iter()
            .filter(|s| s.is_unknown())
            .filter_map(|s| s.user_query.as_deref())
            .collect();
        for query in &unknown {
            if self.strict {
                error!("fact \"{}\" does not exist", query);
            } else {
                debug!("fact \"{}\" does not exist", query);
            }
        }

        let mut kept: IndexMap<(String, Option<String>), ResolvedFact> = IndexMap::new();
        for mut fact in facts {
            if fact.is_legacy() && !self.legacy_visible {
                continue;
            }
            if !fact.filter_tokens.is_empty() {
                fact.value = fact.value.dig(&fact.filter_tokens).cloned().unwrap_or_default();
            }
            if self.strict
                && fact.user_query.as_deref() == Some(fact.name.as_str())
                && unknown.contains(fact.name.as_str())
            {
                fact.unresolved = true;
            }

            let key = (fact.name.clone(), fact.user_query.clone());
            match kept.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(fact);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().is_legacy() && !fact.is_legacy() {
                        slot.insert(fact);
                    }
                }
            }
        }

        kept.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::FactKind;
    use crate::registry::FactName;
    use crate::value::{FactMap, FactValue, FilterToken};

    fn unknown(query: &str) -> SearchedFact {
        SearchedFact {
            name: FactName::Literal(query.to_string()),
            user_query: Some(query.to_string()),
            kind: FactKind::Core,
            filter_tokens: Vec::new(),
            probe: None,
        }
    }

    fn release() -> FactValue {
        let mut map = FactMap::new();
        map.insert("full".into(), "12.5".into());
        map.insert("major".into(), "12".into());
        FactValue::Map(map)
    }

    #[test]
    fn test_legacy_hidden() {
        let facts = vec![
            ResolvedFact::core("disks", FactValue::Null),
            ResolvedFact::legacy("blockdevices", "sda"),
        ];
        let kept = FactFilter::new(false, false).filter(&[], facts.clone());
        assert_eq!(kept, vec![facts[0].clone()]);

        let kept = FactFilter::new(false, true).filter(&[], facts);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_tokens_dig_value() {
        let mut fact = ResolvedFact::core("os.release", release());
        fact.user_query = Some("os.release.major".into());
        fact.filter_tokens = vec![FilterToken::parse("major")];
        let mut missing = fact.clone();
        missing.user_query = Some("os.release.patch".into());
        missing.filter_tokens = vec![FilterToken::parse("patch")];

        let kept = FactFilter::new(false, false).filter(&[], vec![fact, missing]);
        assert_eq!(kept[0].value, FactValue::from("12"));
        assert_eq!(kept[1].value, FactValue::Null);
    }

    #[test]
    fn test_strict_marks_unknown() {
        let searched = [unknown("no_such_fact")];
        let facts = vec![
            ResolvedFact::null("no_such_fact", FactKind::Core).answering(&searched[0]),
        ];

        let kept = FactFilter::new(true, true).filter(&searched, facts.clone());
        assert!(kept[0].unresolved);

        let kept = FactFilter::new(false, true).filter(&searched, facts);
        assert!(!kept[0].unresolved);
        assert!(kept[0].value.is_null());
    }

    #[test]
    fn test_known_null_is_not_unresolved() {
        let facts = vec![ResolvedFact::null("dmi.product.uuid", FactKind::Core)];
        let kept = FactFilter::new(true, false).filter(&[], facts);
        assert!(!kept[0].unresolved);
    }

    #[test]
    fn test_dedup_prefers_core() {
        let facts = vec![
            ResolvedFact::legacy("uptime", "3 days"),
            ResolvedFact::core("uptime", "3 days"),
            ResolvedFact::core("uptime", "3 days"),
        ];
        let kept = FactFilter::new(false, true).filter(&[], facts);
        assert_eq!(kept, vec![ResolvedFact::core("uptime", "3 days")]);
    }

    #[test]
    fn test_same_fact_for_different_queries_is_kept() {
        let mut os = ResolvedFact::core("os.name", "Debian");
        os.user_query = Some("os".into());
        let mut exact = ResolvedFact::core("os.name", "Debian");
        exact.user_query = Some("os.name".into());

        let kept = FactFilter::new(false, true).filter(&[], vec![os, exact]);
        assert_eq!(kept.len(), 2);
    }
}
