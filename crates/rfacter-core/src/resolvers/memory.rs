//! Memory and swap from `/proc/meminfo`.

use super::Source;
use super::parser::parse_meminfo;
use crate::error::ProbeError;
use crate::fmt::{bytes_to_human, bytes_to_mb, capacity};
use crate::fs::FileSystem;
use crate::value::FactMap;
use std::path::Path;
use std::sync::Arc;

const MEMINFO: &str = "/proc/meminfo";

/// Keys use a `system.` or `swap.` prefix followed by `total`, `available`,
/// `used` (human-readable), their `_bytes` and `_mb` counterparts, and
/// `capacity`. Swap keys are present only when swap is configured.
pub struct Memory<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Memory<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Memory<F> {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let content = self.fs.read_to_string(Path::new(MEMINFO))?;
        let meminfo = parse_meminfo(&content)?;
        let get = |key: &str| meminfo.get(key).copied().unwrap_or(0);

        let total = get("MemTotal");
        // Kernels before 3.14 have no MemAvailable.
        let available = meminfo
            .get("MemAvailable")
            .copied()
            .unwrap_or_else(|| get("MemFree") + get("Buffers") + get("Cached"));

        let mut values = FactMap::new();
        insert_usage(&mut values, "system", total, available);

        let swap_total = get("SwapTotal");
        if swap_total > 0 {
            insert_usage(&mut values, "swap", swap_total, get("SwapFree"));
        }

        Ok(values)
    }
}

fn insert_usage(values: &mut FactMap, prefix: &str, total: u64, available: u64) {
    let available = available.min(total);
    let used = total - available;

    for (name, bytes) in [("total", total), ("available", available), ("used", used)] {
        values.insert(format!("{}.{}", prefix, name), bytes_to_human(bytes).into());
        values.insert(format!("{}.{}_bytes", prefix, name), bytes.into());
        values.insert(format!("{}.{}_mb", prefix, name), bytes_to_mb(bytes).into());
    }
    values.insert(format!("{}.capacity", prefix), capacity(used, total).into());
}
