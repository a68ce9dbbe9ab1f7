//! Fact registry and loader.
//!
//! A `FactRegistry` maps every fact a platform offers to the probe producing
//! it. Each canonical entry is followed by its legacy aliases, which share the
//! canonical entry's probe:
//!
//! ```text
//!   disks                 ── DisksFact ──┐
//!   blockdevices          (legacy)  ─────┤ same Arc<dyn Probe>
//!   blockdevice_.*_size   (legacy)  ─────┤
//!   blockdevice_.*_model  (legacy)  ─────┘
//! ```
//!
//! The `FactLoader` turns a registry into the entry list for one run:
//! canonical entries only, or canonical plus legacy, minus blocked facts.

pub mod pattern;

pub use pattern::{AliasPattern, FactName, WILDCARD};

use crate::error::FacterError;
use crate::fact::FactKind;
use crate::options::Options;
use crate::platform::Platform;
use crate::probe::Probe;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One registry entry.
#[derive(Clone)]
pub struct FactDefinition {
    pub name: FactName,
    pub kind: FactKind,
    pub probe: Arc<dyn Probe>,
    /// Canonical name this entry belongs to; its own name for core entries.
    pub canonical: String,
}

impl fmt::Debug for FactDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("canonical", &self.canonical)
            .finish()
    }
}

/// All facts one platform offers, in registration order.
#[derive(Debug, Default, Clone)]
pub struct FactRegistry {
    entries: Vec<FactDefinition>,
    names: HashSet<String>,
}

impl FactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canonical fact and its legacy aliases.
    ///
    /// Canonical names must be literal. Names already registered (canonical
    /// or alias) are rejected.
    pub fn register(
        &mut self,
        name: &str,
        probe: Arc<dyn Probe>,
        aliases: &[&str],
    ) -> Result<(), FacterError> {
        let canonical = FactName::parse(name)?;
        if canonical.is_pattern() {
            return Err(FacterError::InvalidPattern {
                pattern: name.to_string(),
                reason: "canonical names cannot contain a wildcard".to_string(),
            });
        }

        let mut entries = vec![(canonical, FactKind::Core)];
        for alias in aliases {
            entries.push((FactName::parse(alias)?, FactKind::Legacy));
        }

        let mut seen = HashSet::new();
        for (entry, _) in &entries {
            if self.names.contains(entry.as_str()) || !seen.insert(entry.as_str()) {
                return Err(FacterError::DuplicateFact(entry.to_string()));
            }
        }

        for (entry, kind) in entries {
            self.names.insert(entry.as_str().to_string());
            self.entries.push(FactDefinition {
                name: entry,
                kind,
                probe: Arc::clone(&probe),
                canonical: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its registered name.
    pub fn get(&self, name: &str) -> Option<&FactDefinition> {
        self.entries.iter().find(|e| e.name.as_str() == name)
    }

    /// Canonical entries only.
    pub fn canonical(&self) -> impl Iterator<Item = &FactDefinition> {
        self.entries.iter().filter(|e| e.kind == FactKind::Core)
    }

    /// Every entry, canonical and legacy.
    pub fn with_legacy(&self) -> impl Iterator<Item = &FactDefinition> {
        self.entries.iter()
    }
}

/// Produces the registry for a platform.
pub trait FactSource: Send + Sync {
    fn registry(&self, platform: &Platform) -> Result<FactRegistry, FacterError>;

    /// Named fact groups usable in block lists.
    fn groups(&self) -> IndexMap<String, Vec<String>> {
        IndexMap::new()
    }
}

impl<F> FactSource for F
where
    F: Fn(&Platform) -> Result<FactRegistry, FacterError> + Send + Sync,
{
    fn registry(&self, platform: &Platform) -> Result<FactRegistry, FacterError> {
        self(platform)
    }
}

/// Entries searched in one run and the names blocked from it.
#[derive(Debug, Default)]
pub struct LoadedFacts {
    pub entries: Vec<FactDefinition>,
    /// Blocked names; probes may still emit them as siblings of facts that
    /// are not blocked, and those siblings must be dropped.
    pub blocked: Vec<FactName>,
}

impl LoadedFacts {
    /// Returns true when a produced fact name belongs to a blocked entry.
    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked.iter().any(|blocked| blocked.covers(name))
    }
}

/// Builds the entry list for one run.
pub struct FactLoader<'a> {
    source: &'a dyn FactSource,
    options: &'a Options,
}

impl<'a> FactLoader<'a> {
    pub fn new(source: &'a dyn FactSource, options: &'a Options) -> Self {
        Self { source, options }
    }

    /// Canonical entries, minus blocked facts.
    pub fn load(&self, platform: &Platform) -> Result<Vec<FactDefinition>, FacterError> {
        Ok(self.load_partitioned(platform, false)?.entries)
    }

    /// Canonical and legacy entries, minus blocked facts.
    pub fn load_with_legacy(
        &self,
        platform: &Platform,
    ) -> Result<Vec<FactDefinition>, FacterError> {
        Ok(self.load_partitioned(platform, true)?.entries)
    }

    /// Splits the registry into the entries to search and the names of every
    /// blocked entry, legacy ones included.
    pub fn load_partitioned(
        &self,
        platform: &Platform,
        legacy: bool,
    ) -> Result<LoadedFacts, FacterError> {
        let registry = self.source.registry(platform)?;
        let blocked_list = self.blocked_facts();

        let mut loaded = LoadedFacts::default();
        for entry in registry.with_legacy() {
            if is_blocked(&blocked_list, &entry.canonical)
                || is_blocked(&blocked_list, entry.name.as_str())
            {
                debug!("Fact {} is blocked", entry.name);
                loaded.blocked.push(entry.name.clone());
            } else if legacy || entry.kind == FactKind::Core {
                loaded.entries.push(entry.clone());
            }
        }

        debug!(
            "Loaded {} of {} facts for {}",
            loaded.entries.len(),
            registry.len(),
            platform
        );
        Ok(loaded)
    }

    /// Fact groups: built-in groups overridden by configured ones.
    pub fn block_groups(&self) -> IndexMap<String, Vec<String>> {
        let mut groups = self.source.groups();
        for (name, facts) in &self.options.fact_groups {
            groups.insert(name.clone(), facts.clone());
        }
        groups
    }

    /// Blocked fact names with groups expanded; empty when blocking is off.
    pub fn blocked_facts(&self) -> Vec<String> {
        if !self.options.block {
            return Vec::new();
        }
        let groups = self.block_groups();
        let mut blocked = Vec::new();
        for entry in &self.options.block_list {
            match groups.get(entry) {
                Some(facts) => blocked.extend(facts.iter().cloned()),
                None => blocked.push(entry.clone()),
            }
        }
        blocked
    }
}

fn is_blocked(blocked: &[String], name: &str) -> bool {
    blocked.iter().any(|b| {
        name == b.as_str()
            || name
                .strip_prefix(b.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}
