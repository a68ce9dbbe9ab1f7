//! Host and domain names.
//!
//! The kernel hostname may already be fully qualified (`db01.corp.internal`);
//! it is split at the first dot. Without a domain part the domain comes from
//! `/etc/resolv.conf` (`domain` line, else first `search` entry).

use super::parser::parse_resolv_conf_domain;
use super::{Source, insert_some};
use crate::error::ProbeError;
use crate::fs::{FileSystem, read_trimmed};
use crate::value::FactMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const HOSTNAME: &str = "/proc/sys/kernel/hostname";
const ETC_HOSTNAME: &str = "/etc/hostname";
const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Keys: `hostname`, `domain`, `fqdn`.
pub struct Hostname<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> Hostname<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> Source for Hostname<F> {
    fn name(&self) -> &'static str {
        "hostname"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let raw = read_trimmed(self.fs.as_ref(), HOSTNAME)
            .or_else(|| read_trimmed(self.fs.as_ref(), ETC_HOSTNAME))
            .ok_or_else(|| ProbeError::InvalidData("no hostname configured".into()))?;

        let (hostname, domain) = match raw.split_once('.') {
            Some((host, domain)) if !host.is_empty() && !domain.is_empty() => {
                debug!("Read hostname {} and domain {}", host, domain);
                (host.to_string(), Some(domain.to_string()))
            }
            _ => {
                debug!("Read hostname {}, no domain part", raw);
                (raw.clone(), None)
            }
        };

        let domain = domain.or_else(|| {
            self.fs
                .read_to_string(Path::new(RESOLV_CONF))
                .ok()
                .and_then(|content| parse_resolv_conf_domain(&content))
        });

        let fqdn = match &domain {
            Some(domain) => format!("{}.{}", hostname, domain),
            None => hostname.clone(),
        };

        let mut values = FactMap::new();
        values.insert("hostname".into(), hostname.into());
        insert_some(&mut values, "domain", domain);
        values.insert("fqdn".into(), fqdn.into());
        Ok(values)
    }
}
