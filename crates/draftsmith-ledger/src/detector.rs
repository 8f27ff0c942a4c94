//! Draft change detection

use crate::state::LedgerState;
use draftsmith_artifact::ContentHash;
use std::path::Path;

/// Compares fresh draft hashes with the ledger
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector<'a> {
    state: &'a LedgerState,
}

impl<'a> ChangeDetector<'a> {
    /// Create detector over a loaded ledger
    #[inline]
    #[must_use]
    pub fn new(state: &'a LedgerState) -> Self {
        Self { state }
    }

    /// True unless the recorded hash for `draft_path` equals `current`
    #[must_use]
    pub fn has_draft_changed(&self, draft_path: &Path, current: &ContentHash) -> bool {
        self.state.draft_hash(draft_path) != Some(current)
    }

    /// Hash the raw bytes of the draft file
    ///
    /// Formatting-only edits produce a different hash.
    ///
    /// # Errors
    /// Returns the IO error if the file cannot be read
    pub fn compute_draft_hash(path: &Path) -> std::io::Result<ContentHash> {
        std::fs::read(path).map(|bytes| ContentHash::compute(&bytes))
    }
}
