//! Nested fact tree.
//!
//! Facts are inserted at the path formed by splitting their name on `.`
//! (legacy names are flat and stay whole), followed by any query filter
//! segments:
//!
//! ```text
//!   os.name = Debian              {"os": {"name": "Debian",
//!   os.release = {full, major} ->         "release": {"full": .., "major": ..}},
//!   blockdevices = sda             "blockdevices": "sda"}
//! ```
//!
//! Null facts are left out. Inserting a mapping where a scalar lives (or the
//! reverse) is a conflict and is never resolved by overwriting.

use crate::error::FacterError;
use crate::fact::ResolvedFact;
use crate::value::{FactMap, FactValue, FilterToken};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FactCollection {
    root: FactMap,
}

impl FactCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tree from final facts.
    ///
    /// Conflicts are logged and the conflicting fact skipped; debug builds
    /// assert since the registry should never produce one.
    pub fn from_facts(facts: &[ResolvedFact]) -> Self {
        let mut collection = Self::new();
        for fact in facts {
            if fact.value.is_null() {
                continue;
            }
            let mut path: Vec<String> = if fact.is_legacy() {
                vec![fact.name.clone()]
            } else {
                fact.name.split('.').map(str::to_string).collect()
            };
            path.extend(fact.filter_tokens.iter().map(FilterToken::as_segment));

            if let Err(e) = collection.insert_at(&path, fact.value.clone()) {
                error!("Dropping fact {}: {}", fact.name, e);
                debug_assert!(false, "{}", e);
            }
        }
        collection
    }

    /// Inserts `value` at the dotted path `name`.
    pub fn insert(&mut self, name: &str, value: impl Into<FactValue>) -> Result<(), FacterError> {
        let path: Vec<&str> = name.split('.').collect();
        self.insert_at(&path, value.into())
    }

    /// Inserts `value` at `path`, creating intermediate mappings and merging
    /// mappings into mappings.
    pub fn insert_at<S: AsRef<str>>(
        &mut self,
        path: &[S],
        value: FactValue,
    ) -> Result<(), FacterError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };

        let mut node = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let child = node
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| FactValue::Map(FactMap::new()));
            node = match child {
                FactValue::Map(map) => map,
                other => {
                    return Err(conflict(&path[..=depth], other, "mapping"));
                }
            };
        }

        place(node, last.as_ref(), value, path)
    }

    /// Looks up a value or subtree by path segments.
    pub fn dig<S: AsRef<str>>(&self, path: &[S]) -> Option<&FactValue> {
        let (first, rest) = path.split_first()?;
        let tokens: Vec<FilterToken> = rest.iter().map(|s| FilterToken::parse(s.as_ref())).collect();
        self.root.get(first.as_ref())?.dig(&tokens)
    }

    /// Looks up a dotted path such as `os.release.major`.
    pub fn value(&self, dotted: &str) -> Option<&FactValue> {
        let path: Vec<&str> = dotted.split('.').collect();
        self.dig(&path)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FactValue)> {
        self.root.iter()
    }

    pub fn into_map(self) -> FactMap {
        self.root
    }
}

/// Stores `value` under `key`, merging mappings recursively. Nothing is
/// written when any part of the value conflicts.
fn place<S: AsRef<str>>(
    node: &mut FactMap,
    key: &str,
    value: FactValue,
    path: &[S],
) -> Result<(), FacterError> {
    let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
    if let Some(existing) = node.get(key) {
        check_merge(existing, &value, &path)?;
    }
    merge(node, key, value);
    Ok(())
}

/// Fails when `incoming` cannot be stored over `existing`.
fn check_merge(
    existing: &FactValue,
    incoming: &FactValue,
    path: &[String],
) -> Result<(), FacterError> {
    match (existing, incoming) {
        (FactValue::Map(existing), FactValue::Map(incoming)) => {
            for (key, child) in incoming {
                if let Some(current) = existing.get(key) {
                    let mut child_path = path.to_vec();
                    child_path.push(key.clone());
                    check_merge(current, child, &child_path)?;
                }
            }
            Ok(())
        }
        (FactValue::Map(_), other) => Err(conflict(path, existing, other.type_name())),
        (other, FactValue::Map(_)) => Err(conflict(path, other, "mapping")),
        _ => Ok(()),
    }
}

/// Merges a value already checked by `check_merge`.
fn merge(node: &mut FactMap, key: &str, value: FactValue) {
    let Some(existing) = node.get_mut(key) else {
        node.insert(key.to_string(), value);
        return;
    };
    match (existing, value) {
        (FactValue::Map(existing), FactValue::Map(incoming)) => {
            for (child_key, child) in incoming {
                merge(existing, &child_key, child);
            }
        }
        (existing, value) => *existing = value,
    }
}

fn conflict<S: AsRef<str>>(path: &[S], existing: &FactValue, incoming: &'static str) -> FacterError {
    FacterError::CollectionConflict {
        path: path.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join("."),
        existing: existing.type_name(),
        incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::FactKind;

    #[test]
    fn test_round_trip() {
        let facts = vec![
            ResolvedFact::core("os.macosx.build", "20A5395g"),
            ResolvedFact::core("os.macosx.product", "macOS"),
        ];
        let collection = FactCollection::from_facts(&facts);

        assert_eq!(
            collection.dig(&["os", "macosx", "build"]),
            Some(&FactValue::from("20A5395g"))
        );
        assert_eq!(
            collection.value("os.macosx.product"),
            Some(&FactValue::from("macOS"))
        );
        let macosx = collection.value("os.macosx").unwrap();
        assert_eq!(macosx.as_map().map(|m| m.len()), Some(2));
        assert_eq!(collection.value("os.windows"), None);
        assert_eq!(collection.dig(&["os", "macosx", "missing"]), None);
    }

    #[test]
    fn test_legacy_names_stay_flat_and_nulls_skipped() {
        let facts = vec![
            ResolvedFact::legacy("blockdevice_sda_size", 21474836480u64),
            ResolvedFact::null("dmi.product.uuid", FactKind::Core),
        ];
        let collection = FactCollection::from_facts(&facts);

        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.value("blockdevice_sda_size"),
            Some(&FactValue::from(21474836480u64))
        );
        assert_eq!(collection.value("dmi"), None);
    }

    #[test]
    fn test_filter_tokens_extend_path() {
        let mut fact = ResolvedFact::core("os.release", "12");
        fact.filter_tokens = vec![FilterToken::parse("major")];
        let collection = FactCollection::from_facts(&[fact]);

        assert_eq!(collection.value("os.release.major"), Some(&FactValue::from("12")));
    }

    #[test]
    fn test_maps_merge() {
        let mut release = FactMap::new();
        release.insert("full".into(), "12.5".into());

        let mut collection = FactCollection::new();
        collection.insert("os.release.major", "12").unwrap();
        collection.insert("os.release", release).unwrap();

        assert_eq!(collection.value("os.release.full"), Some(&FactValue::from("12.5")));
        assert_eq!(collection.value("os.release.major"), Some(&FactValue::from("12")));
    }

    #[test]
    fn test_scalar_replaces_scalar() {
        let mut collection = FactCollection::new();
        collection.insert("kernel", "Linux").unwrap();
        collection.insert("kernel", "Darwin").unwrap();
        assert_eq!(collection.value("kernel"), Some(&FactValue::from("Darwin")));
    }

    #[test]
    fn test_conflicts_are_errors() {
        let mut collection = FactCollection::new();
        collection.insert("os.name", "Debian").unwrap();

        let err = collection.insert("os.name.full", "Debian 12").unwrap_err();
        assert_eq!(
            err,
            FacterError::CollectionConflict {
                path: "os.name".into(),
                existing: "string",
                incoming: "mapping",
            }
        );

        assert!(collection.insert("os", "Linux").is_err());
        assert!(collection.insert("os.name", FactMap::new()).is_err());
        assert_eq!(collection.value("os.name"), Some(&FactValue::from("Debian")));
    }

    #[test]
    fn test_conflicting_merge_writes_nothing() {
        let mut collection = FactCollection::new();
        collection.insert("os.name", "Debian").unwrap();

        let mut os = FactMap::new();
        os.insert("family".into(), "Debian".into());
        os.insert("name".into(), FactValue::Map(FactMap::new()));
        let err = collection.insert("os", os).unwrap_err();
        assert_eq!(
            err,
            FacterError::CollectionConflict {
                path: "os.name".into(),
                existing: "string",
                incoming: "mapping",
            }
        );

        assert_eq!(collection.value("os.family"), None);
        assert_eq!(collection.value("os.name"), Some(&FactValue::from("Debian")));
        assert_eq!(
            collection.value("os").and_then(|v| v.as_map()).map(|m| m.len()),
            Some(1)
        );
    }

    #[test]
    fn test_serializes_as_plain_tree() {
        let mut collection = FactCollection::new();
        collection.insert("os.name", "Debian").unwrap();
        collection.insert("processors.count", 4i64).unwrap();
        assert_eq!(
            serde_json::to_string(&collection).unwrap(),
            r#"{"os":{"name":"Debian"},"processors":{"count":4}}"#
        );
    }

    #[test]
    fn test_array_index_lookup() {
        let mut collection = FactCollection::new();
        collection
            .insert("processors.models", vec!["EPYC", "Xeon"])
            .unwrap();
        assert_eq!(
            collection.value("processors.models.1"),
            Some(&FactValue::from("Xeon"))
        );
    }
}
