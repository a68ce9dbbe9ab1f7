//! Container and hypervisor detection.
//!
//! Checks run in order: container marker files, `/proc/1/cgroup` patterns,
//! then DMI vendor strings. A host matching none of them is `physical`.

use super::{Resolver, Source};
use crate::error::ProbeError;
use crate::fs::FileSystem;
use crate::value::FactMap;
use std::path::Path;
use std::sync::Arc;

const CGROUP: &str = "/proc/1/cgroup";

/// Marker files and the container runtime they reveal.
const MARKERS: [(&str, &str); 3] = [
    ("/.dockerenv", "docker"),
    ("/run/.containerenv", "podman"),
    ("/var/run/secrets/kubernetes.io/serviceaccount/token", "kubernetes"),
];

/// Substrings of `/proc/1/cgroup` and the runtime they reveal.
const CGROUP_PATTERNS: [(&str, &str); 4] = [
    ("kubepods", "kubernetes"),
    ("docker", "docker"),
    ("containerd", "containerd"),
    ("lxc", "lxc"),
];

/// Substrings of DMI manufacturer/product name and the hypervisor they
/// reveal. Matched case-insensitively.
const HYPERVISORS: [(&str, &str); 8] = [
    ("vmware", "vmware"),
    ("virtualbox", "virtualbox"),
    ("innotek", "virtualbox"),
    ("qemu", "kvm"),
    ("kvm", "kvm"),
    ("microsoft corporation", "hyperv"),
    ("xen", "xenhvm"),
    ("amazon ec2", "aws"),
];

/// Keys: `virtual` (hypervisor or container name, `physical` otherwise),
/// `is_virtual`.
pub struct Virtualization<F: FileSystem> {
    fs: Arc<F>,
    dmi: Arc<dyn Resolver>,
}

impl<F: FileSystem> Virtualization<F> {
    /// `dmi` is the shared DMI resolver so firmware files are read once.
    pub fn new(fs: Arc<F>, dmi: Arc<dyn Resolver>) -> Self {
        Self { fs, dmi }
    }

    fn container(&self) -> Option<&'static str> {
        let marked = MARKERS
            .iter()
            .find(|(marker, _)| self.fs.exists(Path::new(marker)))
            .map(|(_, runtime)| *runtime);
        if marked.is_some() {
            return marked;
        }

        let content = self.fs.read_to_string(Path::new(CGROUP)).ok()?;
        CGROUP_PATTERNS
            .iter()
            .find(|(pattern, _)| content.contains(pattern))
            .map(|(_, runtime)| *runtime)
    }

    fn hypervisor(&self) -> Option<&'static str> {
        let identity = ["manufacturer", "product_name"]
            .iter()
            .filter_map(|key| self.dmi.resolve(key))
            .filter_map(|value| value.as_str().map(str::to_ascii_lowercase))
            .collect::<Vec<_>>()
            .join(" ");
        if identity.contains("google") {
            return Some("gce");
        }
        HYPERVISORS
            .iter()
            .find(|(pattern, _)| identity.contains(pattern))
            .map(|(_, hypervisor)| *hypervisor)
    }
}

impl<F: FileSystem> Source for Virtualization<F> {
    fn name(&self) -> &'static str {
        "virtualization"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let detected = self.container().or_else(|| self.hypervisor());

        let mut values = FactMap::new();
        values.insert("virtual".into(), detected.unwrap_or("physical").into());
        values.insert("is_virtual".into(), detected.is_some().into());
        Ok(values)
    }
}
