//! Generated-file records and ownership policy

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Per-file generation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Safe to overwrite on every build
    Regenerate,
    /// Written once; later builds never overwrite it without `force`
    ScaffoldOnly,
}

impl Ownership {
    /// Stable identifier used in config and ledger files
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::ScaffoldOnly => "scaffold_only",
        }
    }

    /// True when this file is protected from silent regeneration
    #[inline]
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::ScaffoldOnly)
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ownership {
    type Err = UnknownOwnership;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regenerate" => Ok(Self::Regenerate),
            "scaffold_only" => Ok(Self::ScaffoldOnly),
            other => Err(UnknownOwnership(other.to_string())),
        }
    }
}

/// Unrecognised ownership identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ownership mode '{0}' (expected 'regenerate' or 'scaffold_only')")]
pub struct UnknownOwnership(pub String);

/// One entry per previously written output file
///
/// # Invariants
/// - `path` is the unique ledger key
/// - `content_hash` is the hash of the last content written to `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFileRecord {
    /// Output path
    pub path: PathBuf,
    /// Hash of the last-written content
    pub content_hash: ContentHash,
    /// Ownership policy declared when the file was written
    pub ownership: Ownership,
    /// Logical table/entity label for reverse lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl GeneratedFileRecord {
    /// Create new record
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content_hash: ContentHash, ownership: Ownership) -> Self {
        Self {
            path: path.into(),
            content_hash,
            ownership,
            table: None,
        }
    }

    /// Attach a table label
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: Option<String>) -> Self {
        self.table = table;
        self
    }
}
