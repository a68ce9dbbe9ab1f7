//! Run options.

use indexmap::IndexMap;
use serde::Deserialize;

/// Options for one resolution run.
///
/// Deserializable with every field optional, so callers can load it from
/// any serde format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Include legacy facts when enumerating without queries.
    pub show_legacy: bool,
    /// Flag queries that match no registered fact as unresolved.
    pub strict: bool,
    /// Apply `block_list`.
    pub block: bool,
    /// Facts or fact groups to skip.
    pub block_list: Vec<String>,
    /// Named groups of facts usable in `block_list`, merged over the
    /// built-in groups.
    pub fact_groups: IndexMap<String, Vec<String>>,
    /// Consult the attached fact cache.
    pub cache: bool,
    /// Log the time spent per resolution unit.
    pub timing: bool,
    /// Worker threads; defaults to the available parallelism.
    pub workers: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_legacy: false,
            strict: false,
            block: true,
            block_list: Vec::new(),
            fact_groups: IndexMap::new(),
            cache: true,
            timing: false,
            workers: None,
        }
    }
}

impl Options {
    /// Returns whether legacy facts are visible for a run with `queries`.
    ///
    /// Explicit queries always see legacy names.
    pub fn legacy_visible<S: AsRef<str>>(&self, queries: &[S]) -> bool {
        self.show_legacy || !queries.is_empty()
    }

    /// Worker thread count, at least one.
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
            .max(1)
    }
}
