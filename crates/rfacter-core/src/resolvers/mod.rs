//! Memoized host resolvers.
//!
//! A resolver wraps one expensive interaction with the host (reading
//! `/proc/meminfo`, walking `/sys/block`, ...) that yields several values at
//! once. The interaction runs at most once per resolution run: the first
//! `resolve` call performs it and stores every value it produced, later calls
//! for any key read the stored map. Concurrent first calls block on the same
//! initialization instead of racing.
//!
//! ```text
//!   FieldFact("memory.system.total") ─┐
//!   FieldFact("memory.swap.total")  ──┼──► Memoized<Memory<F>> ──► /proc/meminfo
//!   FieldFact("memorysize" alias)   ──┘        (OnceLock)              (once)
//! ```
//!
//! A failing interaction is logged and memoized as an empty map, so every key
//! of that resolver resolves to `None` for the rest of the run.

pub mod disks;
pub mod dmi;
pub mod host;
pub mod hostname;
pub mod kernel;
pub mod memory;
pub mod os_release;
pub mod parser;
pub mod processors;
pub mod uptime;
pub mod virtualization;

use crate::error::ProbeError;
use crate::value::{FactMap, FactValue};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, warn};

/// Keyed access to the values of one host interaction.
pub trait Resolver: Send + Sync {
    /// Returns the value stored under `key`, or `None` when the interaction
    /// failed, produced nothing for the key, or produced null.
    fn resolve(&self, key: &str) -> Option<FactValue>;
}

/// One host interaction producing a map of values.
pub trait Source: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Talks to the host. May be slow; may fail.
    fn collect(&self) -> Result<FactMap, ProbeError>;
}

/// Resolver running its source at most once.
pub struct Memoized<S: Source> {
    source: S,
    values: OnceLock<FactMap>,
}

impl<S: Source> Memoized<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            values: OnceLock::new(),
        }
    }

    /// Wraps the source in an `Arc` ready to be shared between probes.
    pub fn shared(source: S) -> Arc<Self> {
        Arc::new(Self::new(source))
    }

    /// Returns every value the source produced, running it on first use.
    pub fn values(&self) -> &FactMap {
        self.values.get_or_init(|| {
            let start = Instant::now();
            match self.source.collect() {
                Ok(values) => {
                    debug!(
                        "Resolver {}: {} values in {:?}",
                        self.source.name(),
                        values.len(),
                        start.elapsed()
                    );
                    values
                }
                Err(e) => {
                    warn!("Resolver {} failed: {}", self.source.name(), e);
                    FactMap::new()
                }
            }
        })
    }

    /// Returns true once the source has run.
    pub fn is_resolved(&self) -> bool {
        self.values.get().is_some()
    }
}

impl<S: Source> Resolver for Memoized<S> {
    fn resolve(&self, key: &str) -> Option<FactValue> {
        self.values().get(key).filter(|v| !v.is_null()).cloned()
    }
}

/// Inserts `value` under `key` when present.
pub(crate) fn insert_some(map: &mut FactMap, key: &str, value: Option<impl Into<FactValue>>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}
