//! Error types for the build orchestrator
//!
//! Every fatal condition names the offending file or entity:
//! - Draft loading (`DraftNotFound`, `DraftInvalid`, `DraftRead`)
//! - Generation (`Generation`, `UnknownGenerator`, `DuplicateTarget`)
//! - Writing (`Write`, after rollback)
//! - Ledger loading (`Ledger`)
//!
//! `LedgerPersist` is never returned from a build; it is rendered into the
//! result's warnings instead.

use crate::drafting::DraftingError;
use crate::phase::PhaseError;
use draftsmith_draft::DraftError;
use draftsmith_generators::{GenerationError, UnknownGenerator};
use draftsmith_ledger::LedgerError;
use std::path::PathBuf;

/// Main orchestrator error type
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Draft file does not exist
    #[error("draft not found: {path}")]
    DraftNotFound {
        /// Draft path
        path: PathBuf,
    },

    /// Draft is not valid structured data or fails schema checks
    #[error("invalid draft {path}: {message}")]
    DraftInvalid {
        /// Draft path
        path: PathBuf,
        /// Human-readable reason
        message: String,
    },

    /// Draft exists but could not be read
    #[error("failed to read draft {path}: {source}")]
    DraftRead {
        /// Draft path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A generator failed; nothing was written
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// `only` or the configured generator list named an unknown generator
    #[error(transparent)]
    UnknownGenerator(#[from] UnknownGenerator),

    /// Two candidates target the same file
    #[error("generators '{first}' and '{second}' both target {path}")]
    DuplicateTarget {
        /// Shared target path
        path: PathBuf,
        /// Generator that claimed the path first
        first: String,
        /// Generator that claimed it again
        second: String,
    },

    /// A write failed; files written earlier in the run were restored
    #[error("failed to write {path}: {source} (rolled back {restored} file(s){})", rollback_note(.rollback_failures))]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
        /// Files restored to their previous state
        restored: usize,
        /// Files that could not be restored
        rollback_failures: Vec<PathBuf>,
    },

    /// The ledger could not be read
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Ledger persistence failed after every attempt
    #[error("ledger {path} not updated after {attempts} attempt(s): {source}")]
    LedgerPersist {
        /// Ledger path
        path: PathBuf,
        /// Attempts made
        attempts: u32,
        /// Last error
        #[source]
        source: LedgerError,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Drafting backend failed
    #[error(transparent)]
    Drafting(#[from] DraftingError),

    /// Internal phase ordering violated
    #[error(transparent)]
    Phase(#[from] PhaseError),
}

fn rollback_note(failures: &[PathBuf]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        let paths: Vec<String> = failures.iter().map(|p| p.display().to_string()).collect();
        format!("; could not restore {}", paths.join(", "))
    }
}

impl ForgeError {
    /// Create write error after a rollback
    pub fn write_error(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        restored: usize,
        rollback_failures: Vec<PathBuf>,
    ) -> Self {
        Self::Write {
            path: path.into(),
            source,
            restored,
            rollback_failures,
        }
    }

    /// Check if the error happened before anything was written
    #[inline]
    #[must_use]
    pub fn is_pre_write(&self) -> bool {
        !matches!(self, Self::Write { .. } | Self::LedgerPersist { .. })
    }
}

impl From<DraftError> for ForgeError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::NotFound { path } => Self::DraftNotFound { path },
            DraftError::Invalid { path, message } => Self::DraftInvalid { path, message },
            DraftError::Io { path, source } => Self::DraftRead { path, source },
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or unknown value
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Decoding error
        #[source]
        source: toml::de::Error,
    },

    /// Output root cannot be made absolute
    #[error("cannot resolve output root {path}: {source}")]
    OutputRoot {
        /// Configured root
        path: PathBuf,
        /// Error reading the working directory
        #[source]
        source: std::io::Error,
    },

    /// Semantically invalid value
    #[error("invalid config value for '{key}': {message}")]
    Invalid {
        /// Offending key
        key: String,
        /// Reason
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_errors_map_to_forge_variants() {
        let err: ForgeError = DraftError::not_found("draft.yaml").into();
        assert!(matches!(err, ForgeError::DraftNotFound { .. }));
        assert!(err.to_string().contains("draft.yaml"));

        let err: ForgeError = DraftError::invalid("draft.yaml", "empty").into();
        assert!(matches!(err, ForgeError::DraftInvalid { .. }));
    }

    #[test]
    fn write_error_mentions_rollback() {
        let err = ForgeError::write_error(
            "app/Models/Post.php",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            2,
            vec![PathBuf::from("routes/web.php")],
        );
        let msg = err.to_string();
        assert!(msg.contains("app/Models/Post.php"));
        assert!(msg.contains("rolled back 2 file(s)"));
        assert!(msg.contains("could not restore routes/web.php"));
        assert!(!err.is_pre_write());
    }

    #[test]
    fn generation_error_is_transparent() {
        let err: ForgeError = GenerationError::render("model", "Post", "boom").into();
        assert_eq!(err.to_string(), "model generator failed for 'Post': boom");
        assert!(err.is_pre_write());
    }
}
