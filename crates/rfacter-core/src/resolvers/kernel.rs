//! Kernel release from `/proc/sys/kernel/osrelease`.

use super::Source;
use crate::error::ProbeError;
use crate::fs::{FileSystem, read_trimmed};
use crate::value::FactMap;
use std::sync::Arc;

const OSRELEASE: &str = "/proc/sys/kernel/osrelease";

/// Keys: `release` (`6.1.0-18-amd64`), `version` (`6.1.0`),
/// `major_version` (`6.1`).
pub struct Kernel<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Kernel<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Kernel<F> {
    fn name(&self) -> &'static str {
        "kernel"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let release = read_trimmed(self.fs.as_ref(), OSRELEASE)
            .ok_or_else(|| ProbeError::InvalidData(format!("{} is empty", OSRELEASE)))?;

        let version = release
            .split(['-', '+'])
            .next()
            .unwrap_or(&release)
            .to_string();
        let major_version = version.splitn(3, '.').take(2).collect::<Vec<_>>().join(".");

        let mut values = FactMap::new();
        values.insert("release".into(), release.into());
        values.insert("version".into(), version.into());
        values.insert("major_version".into(), major_version.into());
        Ok(values)
    }
}
