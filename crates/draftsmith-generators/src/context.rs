//! Generation context

use crate::conventions::Conventions;
use crate::stubs::Stubs;
use draftsmith_draft::Draft;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only snapshot of table label → previously generated path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableIndex {
    tables: BTreeMap<String, PathBuf>,
}

impl TableIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded path for `table`
    #[inline]
    #[must_use]
    pub fn path_for(&self, table: &str) -> Option<&Path> {
        self.tables.get(table).map(PathBuf::as_path)
    }

    /// Number of labelled tables
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl From<BTreeMap<String, PathBuf>> for TableIndex {
    fn from(tables: BTreeMap<String, PathBuf>) -> Self {
        Self { tables }
    }
}

/// Everything a generator may read
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Parsed draft
    pub draft: &'a Draft,
    /// Path the draft was read from
    pub draft_path: &'a Path,
    /// Directory candidate paths are resolved against
    pub output_root: &'a Path,
    /// Naming and layout
    pub conventions: &'a Conventions,
    /// Templates
    pub stubs: &'a Stubs,
    /// Ledger snapshot for path reuse
    pub tables: &'a TableIndex,
}

impl GenerationContext<'_> {
    /// Absolute path of `relative` under the output root
    #[inline]
    #[must_use]
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.output_root.join(relative)
    }
}
