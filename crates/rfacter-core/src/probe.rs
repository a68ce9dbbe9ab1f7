//! The fact-level probe contract.
//!
//! A probe turns one or more memoized resolvers into `ResolvedFact`s: its own
//! canonical fact plus any legacy siblings. Several registry entries (a
//! canonical name and its aliases) share one probe instance, and probes may be
//! called from several worker threads at once.

use crate::error::{FacterError, ProbeError};
use crate::fact::ResolvedFact;
use crate::registry::FactRegistry;
use crate::resolvers::Resolver;
use crate::value::FactValue;
use std::sync::Arc;

/// A unit producing one or more facts.
pub trait Probe: Send + Sync {
    /// Produces facts.
    ///
    /// `filter` carries the entity key recovered from a wildcard query
    /// (`"sda"` for `blockdevice_sda_size`); probes emitting per-entity legacy
    /// facts restrict them to that entity.
    fn call(&self, filter: Option<&str>) -> Result<Vec<ResolvedFact>, ProbeError>;
}

impl<F> Probe for F
where
    F: Fn(Option<&str>) -> Result<Vec<ResolvedFact>, ProbeError> + Send + Sync,
{
    fn call(&self, filter: Option<&str>) -> Result<Vec<ResolvedFact>, ProbeError> {
        self(filter)
    }
}

/// Probe reading one resolver key, with optional legacy aliases reading the
/// same or a sibling key.
pub struct FieldFact {
    name: &'static str,
    resolver: Arc<dyn Resolver>,
    key: &'static str,
    legacy: Vec<(&'static str, &'static str)>,
}

impl FieldFact {
    pub fn new(name: &'static str, resolver: &Arc<dyn Resolver>, key: &'static str) -> Self {
        Self {
            name,
            resolver: Arc::clone(resolver),
            key,
            legacy: Vec::new(),
        }
    }

    /// Adds a legacy alias carrying the same value.
    pub fn alias(mut self, name: &'static str) -> Self {
        self.legacy.push((name, self.key));
        self
    }

    /// Adds a legacy alias carrying a different resolver key.
    pub fn alias_from(mut self, name: &'static str, key: &'static str) -> Self {
        self.legacy.push((name, key));
        self
    }

    /// Registers the fact and its aliases.
    pub fn register(self, registry: &mut FactRegistry) -> Result<(), FacterError> {
        let name = self.name;
        let aliases: Vec<&str> = self.legacy.iter().map(|(alias, _)| *alias).collect();
        registry.register(name, Arc::new(self), &aliases)
    }

    fn read(&self, key: &str) -> FactValue {
        self.resolver.resolve(key).unwrap_or_default()
    }
}

impl Probe for FieldFact {
    fn call(&self, _filter: Option<&str>) -> Result<Vec<ResolvedFact>, ProbeError> {
        let mut facts = Vec::with_capacity(1 + self.legacy.len());
        facts.push(ResolvedFact::core(self.name, self.read(self.key)));
        for (alias, key) in &self.legacy {
            facts.push(ResolvedFact::legacy(*alias, self.read(key)));
        }
        Ok(facts)
    }
}
