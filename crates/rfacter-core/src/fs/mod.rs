//! Filesystem access used by the built-in resolvers.
//!
//! Every resolver reads the host through the `FileSystem` trait, so the same
//! code runs against the real `/proc`, `/sys` and `/etc` trees or against an
//! in-memory `MockFs` in tests.

pub mod mock;

use std::io;
use std::path::{Path, PathBuf};

pub use mock::MockFs;

/// Abstraction for the handful of filesystem operations resolvers need.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    ///
    /// Order is unspecified; callers that need a stable order sort the result.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}

/// Reads a file and returns its trimmed content, or `None` when the file is
/// missing, unreadable or blank.
pub fn read_trimmed<F: FileSystem + ?Sized>(fs: &F, path: impl AsRef<Path>) -> Option<String> {
    let content = fs.read_to_string(path.as_ref()).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("os-release");
        fs::write(&path, "ID=debian\n").unwrap();

        let real = RealFs::new();
        assert_eq!(real.read_to_string(&path).unwrap(), "ID=debian\n");
    }

    #[test]
    fn test_real_fs_exists() {
        let dir = tempfile::tempdir().unwrap();
        let real = RealFs::new();
        assert!(real.exists(dir.path()));
        assert!(!real.exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_real_fs_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sda")).unwrap();
        fs::create_dir(dir.path().join("sdb")).unwrap();

        let real = RealFs::new();
        let mut entries = real.read_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![dir.path().join("sda"), dir.path().join("sdb")]
        );
    }

    #[test]
    fn test_read_trimmed() {
        let mut mock = MockFs::new();
        mock.add_file("/etc/hostname", "  web01\n");
        mock.add_file("/etc/blank", "\n\n");

        assert_eq!(read_trimmed(&mock, "/etc/hostname").as_deref(), Some("web01"));
        assert_eq!(read_trimmed(&mock, "/etc/blank"), None);
        assert_eq!(read_trimmed(&mock, "/etc/missing"), None);
    }
}
