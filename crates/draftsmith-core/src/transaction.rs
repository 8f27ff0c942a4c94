//! Multi-file write transaction
//!
//! Captures each target's previous content (or absence) before overwriting it.
//! On failure every target touched by the transaction, including one whose
//! write failed partway, is restored in reverse order.

use crate::fs::Filesystem;
use std::io;
use std::path::{Path, PathBuf};

/// Previous state of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backup {
    /// File did not exist
    Absent,
    /// File had these bytes
    Content(Vec<u8>),
}

/// Outcome of a rollback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Files restored or removed
    pub restored: Vec<PathBuf>,
    /// Files left in their new state
    pub failed: Vec<PathBuf>,
}

/// In-flight writes of one build
#[derive(Debug)]
pub struct WriteTransaction<'fs> {
    fs: &'fs dyn Filesystem,
    backups: Vec<(PathBuf, Backup)>,
}

impl<'fs> WriteTransaction<'fs> {
    /// Start a transaction over `fs`
    #[must_use]
    pub fn new(fs: &'fs dyn Filesystem) -> Self {
        Self {
            fs,
            backups: Vec::new(),
        }
    }

    /// Back up then write `path`
    ///
    /// A failed backup read aborts before the write. The backup is kept even
    /// when the write fails, since a failed write may leave a partial file.
    ///
    /// # Errors
    /// Returns the IO error from reading the previous content or writing
    pub fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let backup = match self.fs.read(path)? {
            Some(previous) => Backup::Content(previous),
            None => Backup::Absent,
        };
        self.backups.push((path.to_path_buf(), backup));
        self.fs.write(path, contents)
    }

    /// Number of targets touched so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.backups.len()
    }

    /// Check if nothing was written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }

    /// Paths touched so far, in write order
    #[must_use]
    pub fn written(&self) -> Vec<&Path> {
        self.backups.iter().map(|(p, _)| p.as_path()).collect()
    }

    /// Restore every written file to its previous state
    pub fn rollback(self) -> RollbackReport {
        let mut report = RollbackReport::default();
        for (path, backup) in self.backups.into_iter().rev() {
            let restored = match &backup {
                Backup::Absent => match self.fs.remove(&path) {
                    // failed before creating the file
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                    other => other,
                },
                Backup::Content(previous) => self.fs.write(&path, previous),
            };
            match restored {
                Ok(()) => report.restored.push(path),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "rollback failed");
                    report.failed.push(path);
                }
            }
        }
        report
    }

    /// Drop the backups; the writes stand
    pub fn commit(self) -> Vec<PathBuf> {
        self.backups.into_iter().map(|(path, _)| path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFilesystem;

    #[test]
    fn rollback_restores_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("existing.php");
        let fresh = dir.path().join("nested/fresh.php");
        std::fs::write(&existing, "old").unwrap();

        let mut tx = WriteTransaction::new(&LocalFilesystem);
        tx.write(&existing, b"new").unwrap();
        tx.write(&fresh, b"fresh").unwrap();
        assert_eq!(tx.len(), 2);

        let report = tx.rollback();
        assert_eq!(report.restored.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "old");
        assert!(!fresh.exists());
    }

    /// Reports a full disk on every write, optionally after writing half
    #[derive(Debug)]
    struct FullDisk {
        partial: bool,
    }

    impl Filesystem for FullDisk {
        fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
            LocalFilesystem.read(path)
        }

        fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            if self.partial {
                LocalFilesystem.write(path, &contents[..contents.len() / 2])?;
            }
            Err(io::Error::other("no space left"))
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            LocalFilesystem.remove(path)
        }
    }

    #[test]
    fn partial_write_of_failing_target_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Post.php");
        std::fs::write(&existing, "<?php // before\n").unwrap();

        let mut tx = WriteTransaction::new(&FullDisk { partial: true });
        let err = tx
            .write(&existing, b"<?php\nclass Post extends Model {}\n")
            .unwrap_err();
        assert_eq!(err.to_string(), "no space left");
        assert_eq!(tx.written(), vec![existing.as_path()]);

        let report = tx.rollback();
        assert_eq!(report.restored, vec![existing.clone()]);
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "<?php // before\n");
    }

    #[test]
    fn failed_write_of_new_file_is_removed_or_never_created() {
        let dir = tempfile::tempdir().unwrap();
        for partial in [true, false] {
            let target = dir.path().join(format!("new_{partial}.php"));
            let disk = FullDisk { partial };
            let mut tx = WriteTransaction::new(&disk);
            assert!(tx.write(&target, b"<?php // new\n").is_err());

            let report = tx.rollback();
            assert_eq!(report.restored, vec![target.clone()]);
            assert!(report.failed.is_empty());
            assert!(!target.exists());
        }
    }

    #[test]
    fn commit_keeps_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.php");
        let mut tx = WriteTransaction::new(&LocalFilesystem);
        tx.write(&path, b"a").unwrap();
        assert_eq!(tx.commit(), vec![path.clone()]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a");
    }
}
