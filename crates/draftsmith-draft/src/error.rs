//! Error types for draft parsing
//!
//! - [`DraftError`]: fatal conditions while loading a draft file
//! - [`ColumnSpecError`]: a column type specification that does not parse

use std::path::PathBuf;

/// Errors while loading a draft
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Draft path does not resolve to an existing file
    #[error("draft not found: {path}")]
    NotFound {
        /// Requested path
        path: PathBuf,
    },

    /// Syntactically malformed or schema-incomplete draft
    #[error("invalid draft {path}: {message}")]
    Invalid {
        /// Draft path
        path: PathBuf,
        /// Human-readable reason
        message: String,
    },

    /// IO error while reading an existing draft
    #[error("io error reading {path}: {source}")]
    Io {
        /// Draft path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl DraftError {
    /// Create invalid-draft error for path
    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create not-found error for path
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors in a column type specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnSpecError {
    /// Nothing but whitespace
    #[error("column '{column}' has an empty type specification")]
    Empty {
        /// Column name
        column: String,
    },

    /// Type token is not an identifier
    #[error("column '{column}' has malformed type '{token}'")]
    MalformedType {
        /// Column name
        column: String,
        /// Offending token
        token: String,
    },

    /// `type:` followed by an empty argument
    #[error("column '{column}' has an empty argument in '{token}'")]
    EmptyArgument {
        /// Column name
        column: String,
        /// Offending token
        token: String,
    },

    /// Modifier outside the supported set
    #[error("column '{column}' has unknown modifier '{modifier}'")]
    UnknownModifier {
        /// Column name
        column: String,
        /// Offending modifier
        modifier: String,
    },
}

impl ColumnSpecError {
    /// Column the error refers to
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Empty { column }
            | Self::MalformedType { column, .. }
            | Self::EmptyArgument { column, .. }
            | Self::UnknownModifier { column, .. } => column,
        }
    }
}
