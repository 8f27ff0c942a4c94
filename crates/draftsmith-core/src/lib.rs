//! draftsmith Core - build orchestrator
//!
//! Turns a draft into generated files, idempotently:
//! - Hashes the draft and short-circuits when nothing changed
//! - Runs the selected generators and reconciles every candidate against the
//!   ledger's hashes and ownership
//! - Writes transactionally, restoring earlier files if a write fails
//! - Updates the ledger only after every write succeeded
//!
//! # Example
//!
//! ```rust,no_run
//! use draftsmith_core::{BuildOptions, Forge, ForgeConfig};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), draftsmith_core::ForgeError> {
//! let config = ForgeConfig::discover(Path::new("."))?;
//! let forge = Forge::new(config)?;
//!
//! let plan = forge.plan(None)?;
//! println!("{} file(s) would be written", plan.writes().len());
//!
//! let result = forge.build(None, &BuildOptions::new().with_only(["model"]));
//! std::process::exit(result.exit_code());
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod conventions;
pub mod drafting;
pub mod error;
pub mod forge;
pub mod fs;
pub mod phase;
pub mod reconcile;
pub mod registry;
pub mod result;
pub mod transaction;

pub use config::{ForgeConfig, CONFIG_FILE};
pub use conventions::{CachedConventions, ConventionSource, StaticConventions};
pub use drafting::{Drafter, DraftingBackend, DraftingError, TemplateBackend};
pub use error::{ConfigError, ForgeError};
pub use forge::Forge;
pub use fs::{Filesystem, LocalFilesystem};
pub use phase::{BuildPhase, PhaseError, PhaseTracker};
pub use reconcile::{Decision, DecisionAction, Reconciler, SkipReason, WriteReason};
pub use registry::Registry;
pub use result::{BuildOptions, BuildResult, PlanResult};
pub use transaction::{RollbackReport, WriteTransaction};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving builds
    pub use crate::{
        BuildOptions, BuildResult, DecisionAction, Forge, ForgeConfig, ForgeError, PlanResult,
        Registry,
    };
}

/// Version of this crate, stamped into the ledger
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
