//! Parsers for host files.
//!
//! These are pure functions over file content so they can be tested with
//! string inputs.

use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses `/etc/os-release` style `KEY=value` content.
///
/// Values may be wrapped in single or double quotes. Comments and malformed
/// lines are skipped.
pub fn parse_os_release(content: &str) -> IndexMap<String, String> {
    let mut result = IndexMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        result.insert(key.trim().to_string(), value.to_string());
    }

    result
}

/// Parses `/proc/meminfo` into byte values.
///
/// Lines carrying a `kB` unit are converted to bytes; unit-less counters
/// (`HugePages_Total`) are kept as is.
pub fn parse_meminfo(content: &str) -> Result<HashMap<String, u64>, ParseError> {
    let mut result = HashMap::new();

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let Some(number) = parts.next() else {
            continue;
        };
        let value: u64 = number
            .parse()
            .map_err(|_| ParseError::new(format!("invalid value for {}", key)))?;
        let value = match parts.next() {
            Some("kB") => value * 1024,
            _ => value,
        };
        result.insert(key.trim().to_string(), value);
    }

    if !result.contains_key("MemTotal") {
        return Err(ParseError::new("missing MemTotal in meminfo"));
    }

    Ok(result)
}

/// Processor summary from `/proc/cpuinfo`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuInfo {
    /// Number of logical processors.
    pub count: usize,
    /// Number of distinct physical packages.
    pub physical_count: usize,
    /// Model name per logical processor, in processor order.
    pub models: Vec<String>,
}

/// Parses `/proc/cpuinfo`.
///
/// Architectures that print no `physical id` lines (most ARM kernels) report
/// one physical package when at least one processor exists.
pub fn parse_cpuinfo(content: &str) -> CpuInfo {
    let mut count = 0;
    let mut packages = BTreeSet::new();
    let mut models = Vec::new();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "processor" => count += 1,
            "physical id" => {
                packages.insert(value.to_string());
            }
            "model name" => models.push(value.to_string()),
            _ => {}
        }
    }

    let physical_count = if packages.is_empty() {
        usize::from(count > 0)
    } else {
        packages.len()
    };

    CpuInfo {
        count,
        physical_count,
        models,
    }
}

/// Parses `/proc/uptime` and returns whole seconds since boot.
pub fn parse_uptime(content: &str) -> Result<u64, ParseError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?;
    let seconds: f64 = first
        .parse()
        .map_err(|_| ParseError::new(format!("invalid uptime: {}", first)))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ParseError::new(format!("invalid uptime: {}", first)));
    }
    Ok(seconds as u64)
}

/// Extracts the DNS domain from `/etc/resolv.conf`.
///
/// A `domain` line wins over the first `search` entry.
pub fn parse_resolv_conf_domain(content: &str) -> Option<String> {
    let mut search = None;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("domain") => {
                if let Some(domain) = parts.next() {
                    return Some(domain.to_string());
                }
            }
            Some("search") if search.is_none() => {
                search = parts.next().map(str::to_string);
            }
            _ => {}
        }
    }

    search
}
