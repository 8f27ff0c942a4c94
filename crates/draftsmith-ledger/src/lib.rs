//! draftsmith Ledger
//!
//! Durable record of what previous builds saw and wrote.
//!
//! # Core Concepts
//!
//! - [`LedgerState`]: the JSON document (`version`, `lastRun`, `drafts`, `generated`)
//! - [`LedgerStore`]: full-document load and atomic write-then-rename save
//! - [`ChangeDetector`]: "has this draft changed since the last run"
//!
//! # Example
//!
//! ```rust,no_run
//! use draftsmith_ledger::{ChangeDetector, LedgerStore};
//! use std::path::Path;
//!
//! let store = LedgerStore::new(".draftsmith/ledger.json", "0.1.0");
//! let state = store.load().unwrap();
//! let draft = Path::new("draft.yaml");
//! let hash = ChangeDetector::compute_draft_hash(draft).unwrap();
//! if ChangeDetector::new(&state).has_draft_changed(draft, &hash) {
//!     println!("draft changed");
//! }
//! ```

#![warn(unreachable_pub)]

mod detector;
mod error;
mod state;
mod store;

pub use detector::ChangeDetector;
pub use error::LedgerError;
pub use state::{LedgerState, UNKNOWN_VERSION};
pub use store::LedgerStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
