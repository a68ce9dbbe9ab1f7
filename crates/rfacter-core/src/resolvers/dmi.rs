//! Firmware identification from `/sys/class/dmi/id`.

use super::{Source, insert_some};
use crate::error::ProbeError;
use crate::fs::{FileSystem, read_trimmed};
use crate::value::FactMap;
use std::path::Path;
use std::sync::Arc;

const DMI_DIR: &str = "/sys/class/dmi/id";

/// Resolver keys paired with the sysfs attribute they read.
const ATTRIBUTES: [(&str, &str); 6] = [
    ("manufacturer", "sys_vendor"),
    ("product_name", "product_name"),
    ("serial_number", "product_serial"),
    ("uuid", "product_uuid"),
    ("bios_vendor", "bios_vendor"),
    ("bios_version", "bios_version"),
];

pub struct Dmi<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Dmi<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Dmi<F> {
    fn name(&self) -> &'static str {
        "dmi"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let dir = Path::new(DMI_DIR);
        let mut values = FactMap::new();
        // Serial and uuid are root-only on most kernels; missing entries are
        // left out.
        for (key, attribute) in ATTRIBUTES {
            insert_some(&mut values, key, read_trimmed(self.fs.as_ref(), dir.join(attribute)));
        }
        Ok(values)
    }
}
