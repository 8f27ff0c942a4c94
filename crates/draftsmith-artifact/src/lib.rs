//! draftsmith Artifact Primitives
//!
//! Content hashing and the records kept for every generated file.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte SHA-256 digest, rendered as 64 hex chars
//! - [`hash_text`] / [`hash_structured`]: the Content Hasher
//! - [`Ownership`]: `regenerate` or `scaffold_only`
//! - [`GeneratedFileRecord`]: what the ledger remembers about an output file
//!
//! # Example
//!
//! ```rust
//! use draftsmith_artifact::{hash_text, GeneratedFileRecord, Ownership};
//!
//! let content = "<?php\n\nclass Post {}\n";
//! let record = GeneratedFileRecord::new("app/Models/Post.php", hash_text(content), Ownership::Regenerate);
//! assert_eq!(record.content_hash.to_string().len(), 64);
//! ```

#![warn(unreachable_pub)]

mod hash;
mod record;

pub use hash::{hash_structured, hash_text, ContentHash, HashError};
pub use record::{GeneratedFileRecord, Ownership, UnknownOwnership};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
