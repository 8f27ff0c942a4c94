//! Ledger errors

use std::path::PathBuf;

/// Errors while reading or writing the ledger file
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// IO error while reading
    #[error("io error reading ledger {path}: {source}")]
    Read {
        /// Ledger path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Existing ledger is not a valid document
    #[error("ledger {path} is corrupt: {source}")]
    Corrupt {
        /// Ledger path
        path: PathBuf,
        /// Decoding error
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the document failed
    #[error("ledger serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing or renaming the replacement file failed
    #[error("failed to persist ledger {path}: {source}")]
    Persist {
        /// Ledger path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    /// Create persist error for path
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}
