//! Facts available on every platform without reading host files.

use super::{Source, insert_some};
use crate::error::ProbeError;
use crate::platform::Platform;
use crate::value::FactMap;
use chrono::Local;

/// Keys: `kernel`, `architecture`, `hardware`, `path`, `timezone`,
/// `version`, `processor_count`.
pub struct Host {
    platform: Platform,
}

impl Host {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Source for Host {
    fn name(&self) -> &'static str {
        "host"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let mut values = FactMap::new();
        values.insert("kernel".into(), self.platform.kernel_name().into());
        values.insert("architecture".into(), architecture(&self.platform).into());
        values.insert("hardware".into(), std::env::consts::ARCH.into());
        insert_some(&mut values, "path", std::env::var("PATH").ok());
        values.insert(
            "timezone".into(),
            Local::now().format("%:z").to_string().into(),
        );
        values.insert("version".into(), env!("CARGO_PKG_VERSION").into());
        insert_some(
            &mut values,
            "processor_count",
            std::thread::available_parallelism().ok().map(|n| n.get()),
        );
        Ok(values)
    }
}

/// Debian-style architecture names on Linux, the raw target name elsewhere.
fn architecture(platform: &Platform) -> &'static str {
    match (platform, std::env::consts::ARCH) {
        (Platform::Linux, "x86_64") => "amd64",
        (Platform::Linux, "aarch64") => "arm64",
        (_, arch) => arch,
    }
}
