//! Pairs searched facts with the raw facts probes produced.
//!
//! Probes return more than was asked for: a disk probe asked for `disks`
//! also returns `blockdevices` and one `blockdevice_<name>_size` per disk.
//! The augmenter emits exactly one fact per literal searched fact (a null
//! one when nothing matched), every materialized fact of a wildcard family,
//! and, when legacy names are visible, the remaining legacy extras.
//! Extras named after a blocked entry are dropped, so a blocked alias stays
//! hidden even when a sibling fact's probe produces it.

use crate::fact::{ResolvedFact, SearchedFact};
use crate::registry::FactName;
use std::collections::{HashMap, HashSet};

pub struct FactAugmenter {
    legacy_visible: bool,
    blocked: Vec<FactName>,
}

impl FactAugmenter {
    pub fn new(legacy_visible: bool) -> Self {
        Self {
            legacy_visible,
            blocked: Vec::new(),
        }
    }

    /// Names of blocked entries whose facts must never be emitted.
    pub fn blocking(mut self, blocked: Vec<FactName>) -> Self {
        self.blocked = blocked;
        self
    }

    fn is_blocked(&self, name: &str) -> bool {
        self.blocked.iter().any(|blocked| blocked.covers(name))
    }

    pub fn augment(&self, searched: &[SearchedFact], raw: Vec<ResolvedFact>) -> Vec<ResolvedFact> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, fact) in raw.iter().enumerate() {
            index.entry(fact.name.as_str()).or_insert(i);
        }

        let mut consumed: HashSet<&str> = HashSet::new();
        let mut augmented = Vec::with_capacity(searched.len());

        for fact in searched {
            match (&fact.name, &fact.user_query) {
                (FactName::Pattern(pattern), None) => {
                    let matching = raw
                        .iter()
                        .filter(|r| pattern.matches(&r.name) && !self.is_blocked(&r.name));
                    for candidate in matching {
                        if consumed.insert(candidate.name.as_str()) {
                            augmented.push(candidate.clone().answering(fact));
                        }
                    }
                }
                (FactName::Pattern(_), Some(query)) => {
                    augmented.push(self.pick(&raw, &index, &mut consumed, query, fact));
                }
                (FactName::Literal(name), _) => {
                    augmented.push(self.pick(&raw, &index, &mut consumed, name, fact));
                }
            }
        }

        if self.legacy_visible {
            for fact in raw
                .iter()
                .filter(|r| r.is_legacy() && !self.is_blocked(&r.name))
            {
                if consumed.insert(fact.name.as_str()) {
                    augmented.push(fact.clone());
                }
            }
        }

        augmented
    }

    /// The raw fact named `name`, or a null fact of the searched kind.
    /// Blocked names are always null.
    fn pick<'r>(
        &self,
        raw: &'r [ResolvedFact],
        index: &HashMap<&str, usize>,
        consumed: &mut HashSet<&'r str>,
        name: &str,
        searched: &SearchedFact,
    ) -> ResolvedFact {
        if self.is_blocked(name) {
            return ResolvedFact::null(name, searched.kind).answering(searched);
        }
        match index.get(name) {
            Some(&i) => {
                consumed.insert(raw[i].name.as_str());
                raw[i].clone().answering(searched)
            }
            None => ResolvedFact::null(name, searched.kind).answering(searched),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::FactKind;
    use crate::value::FactValue;

    fn searched(name: &str, query: Option<&str>, kind: FactKind) -> SearchedFact {
        SearchedFact {
            name: FactName::parse(name).unwrap(),
            user_query: query.map(str::to_string),
            kind,
            filter_tokens: Vec::new(),
            probe: None,
        }
    }

    fn disk_facts() -> Vec<ResolvedFact> {
        vec![
            ResolvedFact::core("disks", FactValue::Null),
            ResolvedFact::legacy("blockdevices", "sda,sdb"),
            ResolvedFact::legacy("blockdevice_sda_size", 21474836480u64),
            ResolvedFact::legacy("blockdevice_sdb_size", 1073741824u64),
        ]
    }

    fn names(facts: &[ResolvedFact]) -> Vec<&str> {
        facts.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_literal_match_and_extras_dropped() {
        let facts = FactAugmenter::new(false).augment(
            &[searched("disks", Some("disks"), FactKind::Core)],
            disk_facts(),
        );
        assert_eq!(names(&facts), vec!["disks"]);
        assert_eq!(facts[0].user_query.as_deref(), Some("disks"));
    }

    #[test]
    fn test_extras_pass_through_when_legacy_visible() {
        let facts = FactAugmenter::new(true).augment(
            &[searched("disks", None, FactKind::Core)],
            disk_facts(),
        );
        assert_eq!(
            names(&facts),
            vec![
                "disks",
                "blockdevices",
                "blockdevice_sda_size",
                "blockdevice_sdb_size"
            ]
        );
        assert_eq!(facts[1].user_query, None);
    }

    #[test]
    fn test_missing_literal_becomes_null() {
        let facts = FactAugmenter::new(false).augment(
            &[searched("dmi.product.uuid", None, FactKind::Core)],
            Vec::new(),
        );
        assert_eq!(facts, vec![ResolvedFact::null("dmi.product.uuid", FactKind::Core)]);
    }

    #[test]
    fn test_wildcard_query_picks_one_entity() {
        let facts = FactAugmenter::new(true).augment(
            &[searched(
                "blockdevice_.*_size",
                Some("blockdevice_sdb_size"),
                FactKind::Legacy,
            )],
            disk_facts(),
        );
        assert_eq!(facts[0].name, "blockdevice_sdb_size");
        assert_eq!(facts[0].value, FactValue::from(1073741824u64));
        assert_eq!(facts[0].user_query.as_deref(), Some("blockdevice_sdb_size"));
        // Exactly one entry for the queried entity.
        assert_eq!(
            facts.iter().filter(|f| f.name == "blockdevice_sdb_size").count(),
            1
        );
    }

    #[test]
    fn test_wildcard_query_for_unknown_entity_is_null() {
        let facts = FactAugmenter::new(false).augment(
            &[searched(
                "blockdevice_.*_size",
                Some("blockdevice_sdz_size"),
                FactKind::Legacy,
            )],
            disk_facts(),
        );
        assert_eq!(
            facts,
            vec![
                ResolvedFact::null("blockdevice_sdz_size", FactKind::Legacy)
                    .answering(&searched("x", Some("blockdevice_sdz_size"), FactKind::Legacy))
            ]
        );
    }

    #[test]
    fn test_wildcard_enumeration_materializes_each_entity() {
        let facts = FactAugmenter::new(true).augment(
            &[
                searched("blockdevice_.*_size", None, FactKind::Legacy),
                searched("blockdevices", None, FactKind::Legacy),
            ],
            disk_facts(),
        );
        assert_eq!(
            names(&facts),
            vec!["blockdevice_sda_size", "blockdevice_sdb_size", "blockdevices"]
        );
    }

    #[test]
    fn test_blocked_extras_are_dropped() {
        let blocked = vec![
            FactName::parse("blockdevices").unwrap(),
            FactName::parse("blockdevice_.*_size").unwrap(),
        ];
        let facts = FactAugmenter::new(true).blocking(blocked).augment(
            &[
                searched("disks", None, FactKind::Core),
                searched("blockdevices", Some("blockdevices"), FactKind::Legacy),
            ],
            disk_facts(),
        );
        assert_eq!(names(&facts), vec!["disks", "blockdevices"]);
        assert!(facts[1].value.is_null());
    }

    #[test]
    fn test_duplicate_raw_facts_emitted_once() {
        let mut raw = disk_facts();
        raw.extend(disk_facts());
        let facts = FactAugmenter::new(true).augment(
            &[
                searched("disks", None, FactKind::Core),
                searched("blockdevices", None, FactKind::Legacy),
            ],
            raw,
        );
        assert_eq!(facts.len(), 4);
    }
}
