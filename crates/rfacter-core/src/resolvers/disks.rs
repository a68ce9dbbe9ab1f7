//! Block devices from `/sys/block`.
//!
//! Each `/sys/block/<name>` directory is one disk. `size` counts 512-byte
//! sectors regardless of the device's logical block size. Loop and ram
//! devices are skipped.

use super::{Source, insert_some};
use crate::error::ProbeError;
use crate::fmt::bytes_to_human;
use crate::fs::{FileSystem, read_trimmed};
use crate::value::{FactMap, FactValue};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const SYS_BLOCK: &str = "/sys/block";
const SECTOR_SIZE: u64 = 512;
const SKIPPED_PREFIXES: [&str; 2] = ["loop", "ram"];

/// Key: `disks`, a map from device name to `{model, size, size_bytes,
/// vendor}`, sorted by name.
pub struct Disks<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Disks<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    fn read_disk(&self, dir: &Path) -> FactMap {
        let fs = self.fs.as_ref();
        let mut disk = FactMap::new();

        insert_some(&mut disk, "model", read_trimmed(fs, dir.join("device/model")));
        let bytes = read_trimmed(fs, dir.join("size"))
            .and_then(|s| s.parse::<u64>().ok())
            .map(|sectors| sectors * SECTOR_SIZE);
        if let Some(bytes) = bytes {
            disk.insert("size".into(), bytes_to_human(bytes).into());
            disk.insert("size_bytes".into(), bytes.into());
        }
        insert_some(&mut disk, "vendor", read_trimmed(fs, dir.join("device/vendor")));

        disk
    }
}

impl<F: FileSystem> Source for Disks<F> {
    fn name(&self) -> &'static str {
        "disks"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let mut values = FactMap::new();
        let entries = match self.fs.read_dir(Path::new(SYS_BLOCK)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No block devices: {}", e);
                return Ok(values);
            }
        };

        let mut devices: Vec<(String, FactMap)> = entries
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                if SKIPPED_PREFIXES.iter().any(|p| name.starts_with(p)) {
                    return None;
                }
                Some((name, self.read_disk(path)))
            })
            .collect();
        devices.sort_by(|a, b| a.0.cmp(&b.0));

        if !devices.is_empty() {
            let disks: FactMap = devices
                .into_iter()
                .map(|(name, disk)| (name, FactValue::Map(disk)))
                .collect();
            values.insert("disks".into(), FactValue::Map(disks));
        }
        Ok(values)
    }
}
