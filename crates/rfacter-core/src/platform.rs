//! Operating system identification used to pick a fact registry.

use std::fmt;

/// Operating system family the registry is built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Macosx,
    Windows,
    Freebsd,
    Aix,
    Solaris,
    /// Anything else; gets the generic registry.
    Other(String),
}

impl Platform {
    /// Maps a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::Macosx,
            "windows" => Platform::Windows,
            "freebsd" => Platform::Freebsd,
            "aix" => Platform::Aix,
            "solaris" | "illumos" => Platform::Solaris,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::Macosx => "macosx",
            Platform::Windows => "windows",
            Platform::Freebsd => "freebsd",
            Platform::Aix => "aix",
            Platform::Solaris => "solaris",
            Platform::Other(name) => name,
        }
    }

    /// Kernel name as reported by the `kernel` fact.
    pub fn kernel_name(&self) -> &str {
        match self {
            Platform::Linux => "Linux",
            Platform::Macosx => "Darwin",
            Platform::Windows => "windows",
            Platform::Freebsd => "FreeBSD",
            Platform::Aix => "AIX",
            Platform::Solaris => "SunOS",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports the platform the process runs on.
pub trait PlatformIdentifier: Send + Sync {
    fn identifier(&self) -> Platform;
}

/// Identifies the compile-time target OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentOs;

impl PlatformIdentifier for CurrentOs {
    fn identifier(&self) -> Platform {
        Platform::from_os(std::env::consts::OS)
    }
}

/// A fixed platform, for tests and cross-platform tooling.
impl PlatformIdentifier for Platform {
    fn identifier(&self) -> Platform {
        self.clone()
    }
}
