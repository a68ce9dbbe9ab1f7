//! The `disks` fact and its per-disk legacy family.

use crate::error::{FacterError, ProbeError};
use crate::fact::ResolvedFact;
use crate::probe::Probe;
use crate::registry::FactRegistry;
use crate::resolvers::Resolver;
use crate::value::FactValue;
use std::sync::Arc;

const ALIASES: [&str; 4] = [
    "blockdevices",
    "blockdevice_.*_model",
    "blockdevice_.*_size",
    "blockdevice_.*_vendor",
];

/// Legacy suffix and the disk attribute it carries.
const PER_DISK: [(&str, &str); 3] = [
    ("model", "model"),
    ("size", "size_bytes"),
    ("vendor", "vendor"),
];

/// Emits `disks`, `blockdevices` and `blockdevice_<name>_{model,size,vendor}`.
///
/// A filter restricts the per-disk facts to one disk. No disks at all yields
/// a single null `disks` fact.
pub struct DisksFact {
    resolver: Arc<dyn Resolver>,
}

impl DisksFact {
    pub fn new(resolver: &Arc<dyn Resolver>) -> Self {
        Self {
            resolver: Arc::clone(resolver),
        }
    }

    pub fn register(self, registry: &mut FactRegistry) -> Result<(), FacterError> {
        registry.register("disks", Arc::new(self), &ALIASES)
    }
}

impl Probe for DisksFact {
    fn call(&self, filter: Option<&str>) -> Result<Vec<ResolvedFact>, ProbeError> {
        let disks = match self.resolver.resolve("disks") {
            Some(FactValue::Map(disks)) if !disks.is_empty() => disks,
            _ => return Ok(vec![ResolvedFact::core("disks", FactValue::Null)]),
        };

        let names: Vec<&str> = disks.keys().map(String::as_str).collect();
        let mut facts = vec![
            ResolvedFact::core("disks", FactValue::Map(disks.clone())),
            ResolvedFact::legacy("blockdevices", names.join(",")),
        ];

        for (name, disk) in &disks {
            if filter.is_some_and(|f| f != name.as_str()) {
                continue;
            }
            for (suffix, key) in PER_DISK {
                if let Some(value) = disk.get(key) {
                    facts.push(ResolvedFact::legacy(
                        format!("blockdevice_{}_{}", name, suffix),
                        value.clone(),
                    ));
                }
            }
        }

        Ok(facts)
    }
}
