//! System uptime from `/proc/uptime`.

use super::Source;
use super::parser::parse_uptime;
use crate::error::ProbeError;
use crate::fmt::format_uptime;
use crate::fs::FileSystem;
use crate::value::FactMap;
use std::path::Path;
use std::sync::Arc;

const UPTIME: &str = "/proc/uptime";

/// Keys: `seconds`, `hours`, `days`, `uptime`.
pub struct Uptime<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Uptime<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Uptime<F> {
    fn name(&self) -> &'static str {
        "uptime"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let content = self.fs.read_to_string(Path::new(UPTIME))?;
        let seconds = parse_uptime(&content)?;

        let mut values = FactMap::new();
        values.insert("seconds".into(), seconds.into());
        values.insert("hours".into(), (seconds / 3600).into());
        values.insert("days".into(), (seconds / 86400).into());
        values.insert("uptime".into(), format_uptime(seconds).into());
        Ok(values)
    }
}
