//! Built-in fact catalogue.
//!
//! Every platform gets the generic facts. Linux adds facts read from
//! `/etc`, `/proc` and `/sys` through the `FileSystem` trait; other platforms
//! only get the generic set.

pub mod disks;
pub mod generic;
pub mod linux;

use crate::error::FacterError;
use crate::fs::{FileSystem, RealFs};
use crate::platform::Platform;
use crate::registry::{FactRegistry, FactSource};
use crate::resolvers::host::Host;
use crate::resolvers::{Memoized, Resolver};
use indexmap::IndexMap;
use std::sync::Arc;

/// Fact source backed by the built-in resolvers.
pub struct BuiltinFacts<F: FileSystem> {
    fs: Arc<F>,
}

impl BuiltinFacts<RealFs> {
    /// Reads the real host.
    pub fn host() -> Self {
        Self::new(RealFs::new())
    }
}

impl<F: FileSystem + 'static> BuiltinFacts<F> {
    pub fn new(fs: F) -> Self {
        Self { fs: Arc::new(fs) }
    }
}

impl<F: FileSystem + 'static> FactSource for BuiltinFacts<F> {
    fn registry(&self, platform: &Platform) -> Result<FactRegistry, FacterError> {
        let mut registry = FactRegistry::new();
        let host: Arc<dyn Resolver> = Memoized::shared(Host::new(platform.clone()));
        generic::register(&mut registry, &host, platform)?;

        if *platform == Platform::Linux {
            linux::register(&mut registry, &self.fs)?;
        }
        Ok(registry)
    }

    fn groups(&self) -> IndexMap<String, Vec<String>> {
        default_groups()
    }
}

/// Built-in fact groups for block lists.
pub fn default_groups() -> IndexMap<String, Vec<String>> {
    let groups: [(&str, &[&str]); 5] = [
        ("hardware", &["dmi", "disks", "processors", "memory"]),
        ("hypervisors", &["virtual", "is_virtual"]),
        ("networking", &["networking"]),
        ("operating system", &["os", "kernelrelease", "kernelversion", "kernelmajversion"]),
        ("uptime", &["system_uptime"]),
    ];
    groups
        .iter()
        .map(|(name, facts)| {
            (
                name.to_string(),
                facts.iter().map(|f| f.to_string()).collect(),
            )
        })
        .collect()
}
