//! Processor counts and models from `/proc/cpuinfo`.

use super::Source;
use super::parser::parse_cpuinfo;
use crate::error::ProbeError;
use crate::fs::FileSystem;
use crate::value::{FactMap, FactValue};
use std::path::Path;
use std::sync::Arc;

const CPUINFO: &str = "/proc/cpuinfo";

/// Keys: `count`, `physical_count`, `models`.
pub struct Processors<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Processors<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Processors<F> {
    fn name(&self) -> &'static str {
        "processors"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let content = self.fs.read_to_string(Path::new(CPUINFO))?;
        let info = parse_cpuinfo(&content);
        if info.count == 0 {
            return Err(ProbeError::InvalidData("no processors in cpuinfo".into()));
        }

        let mut values = FactMap::new();
        values.insert("count".into(), info.count.into());
        values.insert("physical_count".into(), info.physical_count.into());
        if !info.models.is_empty() {
            values.insert("models".into(), FactValue::from(info.models));
        }
        Ok(values)
    }
}
