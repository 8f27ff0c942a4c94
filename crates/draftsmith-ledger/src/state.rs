//! Ledger document

use chrono::{DateTime, Utc};
use draftsmith_artifact::{ContentHash, GeneratedFileRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Version reported by a ledger that was never persisted
pub const UNKNOWN_VERSION: &str = "unknown";

fn unknown_version() -> String {
    UNKNOWN_VERSION.to_string()
}

/// The persisted ledger document
///
/// # Invariants
/// - Single source of truth for "has this draft changed" and "is this file
///   safe to overwrite"
/// - Read in full and written in full
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    /// Tool version that last wrote the ledger
    #[serde(default = "unknown_version")]
    pub version: String,
    /// Timestamp of the last successful build
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Draft path → last-seen content hash
    #[serde(default)]
    pub drafts: BTreeMap<PathBuf, ContentHash>,
    /// Output path → record
    #[serde(default)]
    pub generated: BTreeMap<PathBuf, GeneratedFileRecord>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            version: unknown_version(),
            last_run: None,
            drafts: BTreeMap::new(),
            generated: BTreeMap::new(),
        }
    }
}

impl LedgerState {
    /// Last recorded hash for `draft_path`
    #[inline]
    #[must_use]
    pub fn draft_hash(&self, draft_path: &Path) -> Option<&ContentHash> {
        self.drafts.get(draft_path)
    }

    /// Record for a generated file
    #[inline]
    #[must_use]
    pub fn record(&self, path: &Path) -> Option<&GeneratedFileRecord> {
        self.generated.get(path)
    }

    /// Path of the file generated for `table`, if any
    ///
    /// When several files carry the same label the first in path order wins.
    #[must_use]
    pub fn generated_path_for_table(&self, table: &str) -> Option<&Path> {
        self.generated
            .values()
            .find(|record| record.table.as_deref() == Some(table))
            .map(|record| record.path.as_path())
    }

    /// Table label → path index over every labelled record
    #[must_use]
    pub fn table_index(&self) -> BTreeMap<String, PathBuf> {
        let mut index = BTreeMap::new();
        for record in self.generated.values() {
            if let Some(table) = &record.table {
                index
                    .entry(table.clone())
                    .or_insert_with(|| record.path.clone());
            }
        }
        index
    }

    /// Merge a completed run into this state
    ///
    /// Stores the draft hash, replaces the generated-file map, stamps the tool
    /// version and `now`.
    pub fn apply_run(
        &mut self,
        draft_path: &Path,
        draft_hash: ContentHash,
        generated: BTreeMap<PathBuf, GeneratedFileRecord>,
        version: &str,
        now: DateTime<Utc>,
    ) {
        self.drafts.insert(draft_path.to_path_buf(), draft_hash);
        self.generated = generated;
        self.version = version.to_string();
        self.last_run = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_artifact::{hash_text, Ownership};

    fn record(path: &str, table: Option<&str>) -> GeneratedFileRecord {
        GeneratedFileRecord::new(path, hash_text(path), Ownership::Regenerate)
            .with_table(table.map(str::to_string))
    }

    #[test]
    fn default_is_unknown_and_empty() {
        let state = LedgerState::default();
        assert_eq!(state.version, "unknown");
        assert!(state.last_run.is_none());
        assert!(state.drafts.is_empty());
        assert!(state.generated.is_empty());
    }

    #[test]
    fn table_lookup() {
        let mut state = LedgerState::default();
        for r in [
            record("/out/migrations/create_posts_table.php", Some("posts")),
            record("/out/Models/Post.php", None),
        ] {
            state.generated.insert(r.path.clone(), r);
        }
        assert_eq!(
            state.generated_path_for_table("posts"),
            Some(Path::new("/out/migrations/create_posts_table.php"))
        );
        assert_eq!(state.generated_path_for_table("users"), None);
        assert_eq!(state.table_index().len(), 1);
    }

    #[test]
    fn apply_run_replaces_generated_and_keeps_other_drafts() {
        let mut state = LedgerState::default();
        state
            .drafts
            .insert(PathBuf::from("other.yaml"), hash_text("other"));
        state
            .generated
            .insert(PathBuf::from("stale.php"), record("stale.php", None));

        let mut generated = BTreeMap::new();
        generated.insert(PathBuf::from("fresh.php"), record("fresh.php", None));
        let now = Utc::now();
        state.apply_run(Path::new("draft.yaml"), hash_text("draft"), generated, "0.1.0", now);

        assert_eq!(state.drafts.len(), 2);
        assert_eq!(state.draft_hash(Path::new("draft.yaml")), Some(&hash_text("draft")));
        assert!(state.record(Path::new("stale.php")).is_none());
        assert!(state.record(Path::new("fresh.php")).is_some());
        assert_eq!(state.version, "0.1.0");
        assert_eq!(state.last_run, Some(now));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let state: LedgerState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, LedgerState::default());
    }
}
