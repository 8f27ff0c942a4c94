//! draftsmith Draft
//!
//! The declarative input of a build: the Draft Model, its YAML parser, the
//! column specification grammar and the validation rules run by `validate`.
//!
//! # Example
//!
//! ```rust
//! use draftsmith_draft::DraftParser;
//! use std::path::Path;
//!
//! let draft = DraftParser::new()
//!     .parse_str("models:\n  Post:\n    title: string\n", Path::new("draft.yaml"))
//!     .unwrap();
//! assert!(draft.model("Post").is_some());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod column;
pub mod error;
pub mod model;
pub mod parser;
pub mod rules;

pub use column::{ColumnSpec, Modifier};
pub use error::{ColumnSpecError, DraftError};
pub use model::{
    ActionDefinition, ActionParam, Draft, ModelDefinition, PageDefinition, SeederConfig,
    DEFAULT_SCHEMA_VERSION,
};
pub use parser::{DraftParser, EMPTY_DRAFT_MESSAGE};
pub use rules::{builtin_rules, DraftIssue, ValidationRule};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
