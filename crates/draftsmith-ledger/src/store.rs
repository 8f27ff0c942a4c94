//! Ledger persistence
//!
//! [`LedgerStore`] owns the location of the ledger file. Loads never fail on a
//! missing file; saves write a sibling temp file and rename it into place so a
//! reader never observes a half-written document.

use crate::error::LedgerError;
use crate::state::LedgerState;
use chrono::Utc;
use draftsmith_artifact::{ContentHash, GeneratedFileRecord};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ledger file manager
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    version: String,
}

impl LedgerStore {
    /// Create store for the ledger at `path`, stamping `version` on save
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Ledger file location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tool version stamped on save
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Read the full ledger
    ///
    /// Returns [`LedgerState::default`] when no ledger exists yet.
    ///
    /// # Errors
    /// - [`LedgerError::Read`] if an existing file cannot be read
    /// - [`LedgerError::Corrupt`] if it is not a ledger document
    pub fn load(&self) -> Result<LedgerState, LedgerError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no ledger yet, starting empty");
                return Ok(LedgerState::default());
            }
            Err(source) => {
                return Err(LedgerError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| LedgerError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replace the ledger with `state`
    ///
    /// # Errors
    /// Returns [`LedgerError::Persist`] if the temp file cannot be written or
    /// renamed over the ledger
    pub fn save(&self, state: &LedgerState) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(state)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| LedgerError::persist(&self.path, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| LedgerError::persist(&self.path, e))?;
        write_document(&mut tmp, &json).map_err(|e| LedgerError::persist(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| LedgerError::persist(&self.path, e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            files = state.generated.len(),
            "ledger saved"
        );
        Ok(())
    }

    /// Load, merge a completed run, save
    ///
    /// # Errors
    /// Propagates load and save errors
    pub fn update(
        &self,
        draft_path: &Path,
        draft_hash: ContentHash,
        generated: BTreeMap<PathBuf, GeneratedFileRecord>,
    ) -> Result<LedgerState, LedgerError> {
        let mut state = self.load()?;
        state.apply_run(draft_path, draft_hash, generated, &self.version, Utc::now());
        self.save(&state)?;
        Ok(state)
    }

    /// Last recorded hash for `draft_path`
    ///
    /// # Errors
    /// Propagates load errors
    pub fn get_draft_hash(&self, draft_path: &Path) -> Result<Option<ContentHash>, LedgerError> {
        Ok(self.load()?.draft_hash(draft_path).copied())
    }

    /// Path of the file generated for `table`
    ///
    /// # Errors
    /// Propagates load errors
    pub fn get_generated_path_for_table(&self, table: &str) -> Result<Option<PathBuf>, LedgerError> {
        Ok(self
            .load()?
            .generated_path_for_table(table)
            .map(Path::to_path_buf))
    }
}

fn write_document(tmp: &mut tempfile::NamedTempFile, json: &[u8]) -> std::io::Result<()> {
    tmp.write_all(json)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()
}
