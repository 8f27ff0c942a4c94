//! Candidate output files

use draftsmith_artifact::{hash_text, ContentHash, GeneratedFileRecord, Ownership};
use std::path::PathBuf;

/// A file a generator proposes to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute target path
    pub path: PathBuf,
    /// Full file content
    pub content: String,
    /// Declared ownership
    pub ownership: Ownership,
    /// Optional table or entity label
    pub table: Option<String>,
    /// Name of the generator that produced it
    pub generator: String,
}

impl Candidate {
    /// Create candidate without a table label
    #[must_use]
    pub fn new(
        generator: impl Into<String>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        ownership: Ownership,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ownership,
            table: None,
            generator: generator.into(),
        }
    }

    /// Set table label
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Hash of the content
    #[inline]
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        hash_text(&self.content)
    }

    /// Ledger record describing this candidate once written
    #[must_use]
    pub fn to_record(&self) -> GeneratedFileRecord {
        GeneratedFileRecord::new(self.path.clone(), self.content_hash(), self.ownership)
            .with_table(self.table.clone())
    }
}
