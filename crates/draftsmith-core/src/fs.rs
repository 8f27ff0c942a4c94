//! Filesystem port
//!
//! The orchestrator touches output files only through [`Filesystem`], so tests
//! can inject failures mid-run.

use std::fmt;
use std::io;
use std::path::Path;

/// Output file operations used by a build
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Read a file, `None` if it does not exist
    ///
    /// # Errors
    /// Any IO error other than not-found
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Create or replace a file, creating parent directories
    ///
    /// # Errors
    /// Any IO error
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Delete a file
    ///
    /// # Errors
    /// Any IO error
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`Filesystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
