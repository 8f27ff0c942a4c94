//! draftsmith Generators
//!
//! Pluggable producers of candidate output files.
//!
//! # Core Concepts
//!
//! - [`Generator`]: `supports` + `generate`, pure with respect to the draft
//! - [`Candidate`]: target path, content, ownership, optional table label
//! - [`GenerationContext`]: draft, conventions, stubs and a ledger snapshot
//! - [`GeneratorRegistry`]: name → implementation, in generation order
//!
//! # Built-in variants
//!
//! | name | per | default ownership |
//! |---|---|---|
//! | `model` | model | regenerate |
//! | `migration` | model | regenerate |
//! | `factory` | model | regenerate |
//! | `seeder` | model | scaffold_only |
//! | `action` | action | scaffold_only |
//! | `controller` | model | scaffold_only |
//! | `api-controller` | model | scaffold_only |
//! | `request` | model | scaffold_only |
//! | `route` | all pages | regenerate |
//! | `page` | page | scaffold_only |
//! | `script` | all pages | regenerate |
//! | `test` | model | scaffold_only |

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod candidate;
pub mod context;
pub mod conventions;
pub mod error;
pub mod generator;
pub mod naming;
pub mod registry;
pub mod stubs;
pub mod variants;

#[cfg(test)]
mod test_support;

pub use candidate::Candidate;
pub use context::{GenerationContext, TableIndex};
pub use conventions::Conventions;
pub use error::{GenerationError, UnknownGenerator};
pub use generator::{parse_columns, render_stub, Generator};
pub use registry::GeneratorRegistry;
pub use stubs::{render_template, Stubs};
pub use variants::BUILTIN_NAMES;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
