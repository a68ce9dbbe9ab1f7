//! Operating system identification from `/etc/os-release`.

use super::parser::parse_os_release;
use super::{Source, insert_some};
use crate::error::ProbeError;
use crate::fs::{FileSystem, read_trimmed};
use crate::value::{FactMap, FactValue};
use std::path::Path;
use std::sync::Arc;

const OS_RELEASE: &str = "/etc/os-release";
const USR_OS_RELEASE: &str = "/usr/lib/os-release";
const DEBIAN_VERSION: &str = "/etc/debian_version";

/// Reads distribution name, family and release.
///
/// Keys: `name`, `family`, `release` (map with `full`, `major`, `minor`),
/// `release.full`, `release.major`, `release.minor`, `distro_id`,
/// `codename`, `description`.
pub struct OsRelease<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> OsRelease<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Debian keeps the point release outside os-release.
    fn full_release(&self, id: &str, version_id: Option<&str>) -> Option<String> {
        if id == "debian"
            && let Some(version) = read_trimmed(self.fs.as_ref(), DEBIAN_VERSION)
            && version.starts_with(|c: char| c.is_ascii_digit())
        {
            return Some(version);
        }
        version_id.map(str::to_string)
    }
}

impl<F: FileSystem> Source for OsRelease<F> {
    fn name(&self) -> &'static str {
        "os_release"
    }

    fn collect(&self) -> Result<FactMap, ProbeError> {
        let content = match self.fs.read_to_string(Path::new(OS_RELEASE)) {
            Ok(content) => content,
            Err(_) => self.fs.read_to_string(Path::new(USR_OS_RELEASE))?,
        };
        let release = parse_os_release(&content);
        let id = release
            .get("ID")
            .map(|id| id.to_ascii_lowercase())
            .ok_or_else(|| ProbeError::InvalidData("os-release has no ID".into()))?;
        let id_like = release.get("ID_LIKE").map(String::as_str).unwrap_or("");

        let mut values = FactMap::new();
        let name = os_name(&id);
        values.insert("name".into(), name.clone().into());
        insert_some(&mut values, "family", os_family(&id, id_like));

        let full = self.full_release(&id, release.get("VERSION_ID").map(String::as_str));
        if let Some(full) = full {
            let mut parts = full.split('.');
            let major = parts.next().unwrap_or_default().to_string();
            let minor = parts.next().map(str::to_string);

            let mut map = FactMap::new();
            map.insert("full".into(), full.clone().into());
            map.insert("major".into(), major.clone().into());
            insert_some(&mut map, "minor", minor.clone());

            // Ubuntu treats "22.04" as a single major release.
            let major = if id == "ubuntu" { full.clone() } else { major };
            values.insert("release".into(), FactValue::Map(map));
            values.insert("release.full".into(), full.into());
            values.insert("release.major".into(), major.into());
            insert_some(&mut values, "release.minor", minor);
        }

        values.insert("distro_id".into(), name.into());
        insert_some(
            &mut values,
            "codename",
            release.get("VERSION_CODENAME").cloned(),
        );
        insert_some(&mut values, "description", release.get("PRETTY_NAME").cloned());

        Ok(values)
    }
}

fn os_name(id: &str) -> String {
    match id {
        "debian" => "Debian",
        "ubuntu" => "Ubuntu",
        "rhel" => "RedHat",
        "centos" => "CentOS",
        "fedora" => "Fedora",
        "rocky" => "Rocky",
        "almalinux" => "AlmaLinux",
        "amzn" => "Amazon",
        "ol" => "OracleLinux",
        "sles" => "SLES",
        "opensuse" | "opensuse-leap" => "OpenSuSE",
        "alpine" => "Alpine",
        "arch" => "Archlinux",
        "gentoo" => "Gentoo",
        other => {
            let mut chars = other.chars();
            return match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
        }
    }
    .to_string()
}

fn os_family(id: &str, id_like: &str) -> Option<&'static str> {
    let family = |id: &str| match id {
        "debian" | "ubuntu" | "linuxmint" | "raspbian" => Some("Debian"),
        "rhel" | "centos" | "fedora" | "rocky" | "almalinux" | "amzn" | "ol" => Some("RedHat"),
        "sles" | "opensuse" | "opensuse-leap" | "suse" => Some("Suse"),
        "arch" | "manjaro" => Some("Archlinux"),
        "alpine" => Some("Alpine"),
        "gentoo" => Some("Gentoo"),
        _ => None,
    };
    family(id).or_else(|| id_like.split_whitespace().find_map(family))
}
