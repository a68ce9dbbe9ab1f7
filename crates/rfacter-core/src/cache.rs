//! External fact cache contract.
//!
//! A cache can answer a fact before its probe runs. Cached facts skip the
//! orchestrator entirely; freshly resolved facts are stored back.

use crate::fact::{ResolvedFact, SearchedFact};
use crate::registry::FactName;
use crate::value::FactValue;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub trait FactCache: Send + Sync {
    /// Returns a cached value for a fact name.
    fn fetch(&self, name: &str) -> Option<FactValue>;

    /// Stores resolved facts.
    fn store(&self, facts: &[ResolvedFact]);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: FactValue,
    stored_at: DateTime<Utc>,
}

/// In-process cache whose entries expire after a fixed time to live.
#[derive(Debug)]
pub struct MemoryCache {
    ttl: TimeDelta,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn fetch_at(&self, name: &str, now: DateTime<Utc>) -> Option<FactValue> {
        let entries = self.entries.read();
        let entry = entries.get(name)?;
        if now.signed_duration_since(entry.stored_at) > self.ttl {
            debug!("Cached fact {} expired", name);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn store_at(&self, facts: &[ResolvedFact], now: DateTime<Utc>) {
        let mut entries = self.entries.write();
        for fact in facts.iter().filter(|f| !f.value.is_null()) {
            entries.insert(
                fact.name.clone(),
                CacheEntry {
                    value: fact.value.clone(),
                    stored_at: now,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl FactCache for MemoryCache {
    fn fetch(&self, name: &str) -> Option<FactValue> {
        self.fetch_at(name, Utc::now())
    }

    fn store(&self, facts: &[ResolvedFact]) {
        self.store_at(facts, Utc::now());
    }
}

/// Splits searched facts into those needing a probe and facts answered by
/// the cache. Only literal, registered names are looked up.
pub fn split_cached(
    cache: &dyn FactCache,
    searched: &[SearchedFact],
) -> (Vec<SearchedFact>, Vec<ResolvedFact>) {
    let mut pending = Vec::new();
    let mut cached = Vec::new();

    for fact in searched {
        let hit = match &fact.name {
            FactName::Literal(name) if !fact.is_unknown() => cache.fetch(name),
            _ => None,
        };
        match hit {
            Some(value) => {
                debug!("Fact {} answered from cache", fact.name);
                cached.push(ResolvedFact::new(fact.name.as_str(), value, fact.kind));
            }
            None => pending.push(fact.clone()),
        }
    }

    (pending, cached)
}
