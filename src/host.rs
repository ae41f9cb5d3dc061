//! Filesystem view of the host being provisioned.
//!
//! Absolute paths such as `/etc/os-release` are resolved against a root
//! directory. In production the root is `/`; tests point it at a temp dir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Root-relative access to host files
#[derive(Debug, Clone)]
pub struct HostFs {
    root: PathBuf,
}

impl Default for HostFs {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HostFs {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve an absolute host path under the root
    pub fn path(&self, host_path: &str) -> PathBuf {
        self.root.join(host_path.trim_start_matches('/'))
    }

    pub fn exists(&self, host_path: &str) -> bool {
        self.path(host_path).exists()
    }

    /// Read a file; `Ok(None)` when it does not exist
    pub fn read_optional(&self, host_path: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(host_path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, host_path: &str, contents: &str) -> io::Result<()> {
        let path = self.path(host_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}
