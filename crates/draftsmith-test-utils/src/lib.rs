//! Testing utilities for the draftsmith workspace
//!
//! Draft fixtures, throwaway projects and a filesystem that fails on demand.

#![allow(missing_docs)]

use draftsmith_core::{Filesystem, Forge, ForgeConfig, LocalFilesystem};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub const POST_DRAFT: &str = "\
models:
  Post:
    title: string
    body: longtext
";

pub const BLOG_DRAFT: &str = "\
models:
  User:
    name: string
    email: string unique
  Post:
    title: string:255
    body: longtext
    published_at: timestamp nullable
    user_id: id:User foreign
    relationships:
      belongsTo: User
actions:
  PublishPost:
    model: Post
    params:
      post: Post
    returns: Post
pages:
  PostIndex:
    props:
      posts: Post[]
";

pub const EMPTY_DRAFT: &str = "\
models: {}
actions: {}
pages: {}
";

/// A model whose column spec no generator can render
pub const BROKEN_COLUMN_DRAFT: &str = "\
models:
  Post:
    title: string shiny
";

/// A temporary project directory holding a draft and generated output
#[derive(Debug)]
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn with_draft(content: &str) -> Self {
        let project = Self::new();
        project.write_draft(content);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn draft_path(&self) -> PathBuf {
        self.root().join("draft.yaml")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root().join(".draftsmith").join("ledger.json")
    }

    /// The project root spelled relative to the current directory
    #[cfg(unix)]
    pub fn relative_root(&self) -> PathBuf {
        let cwd = std::env::current_dir().expect("current dir");
        let mut relative = PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.join(self.root().strip_prefix("/").expect("absolute temp dir"))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write_draft(&self, content: &str) {
        std::fs::write(self.draft_path(), content).expect("write draft");
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn read(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.path(relative)).ok()
    }

    pub fn config(&self) -> ForgeConfig {
        ForgeConfig::new().with_output_root(self.root())
    }

    pub fn forge(&self) -> Forge {
        Forge::new(self.config()).expect("valid config")
    }

    pub fn forge_with_fs(&self, fs: impl Filesystem + 'static) -> Forge {
        self.forge().with_filesystem(Box::new(fs))
    }

    /// Every file under the project, relative path → bytes
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }

    /// Point the ledger directory at nowhere so saves fail while loads see
    /// an empty ledger
    #[cfg(unix)]
    pub fn break_ledger_dir(&self) {
        std::os::unix::fs::symlink(self.root().join("nowhere"), self.root().join(".draftsmith"))
            .expect("create dangling symlink");
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, files);
        } else if let Ok(bytes) = std::fs::read(&path) {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            files.insert(relative, bytes);
        }
    }
}

/// Local filesystem that fails selected writes
#[derive(Debug, Default)]
pub struct FailingFilesystem {
    inner: LocalFilesystem,
    fail_on_write: Option<usize>,
    fail_suffix: Option<String>,
    truncate: bool,
    writes: AtomicUsize,
}

impl FailingFilesystem {
    /// Fail the `n`th write (1-based)
    pub fn on_nth_write(n: usize) -> Self {
        Self {
            fail_on_write: Some(n),
            ..Self::default()
        }
    }

    /// Fail every write to a path ending in `suffix`
    pub fn on_path_suffix(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }

    /// Leave the first half of the content behind before failing
    pub fn truncating(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Filesystem for FailingFilesystem {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        let by_count = self.fail_on_write == Some(n);
        let by_path = self
            .fail_suffix
            .as_deref()
            .is_some_and(|suffix| path.to_string_lossy().ends_with(suffix));
        if by_count || by_path {
            if self.truncate {
                self.inner.write(path, &contents[..contents.len() / 2])?;
            }
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure writing {}", path.display()),
            ));
        }
        self.inner.write(path, contents)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.inner.remove(path)
    }
}
