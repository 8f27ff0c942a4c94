//! Generator trait
//!
//! Provides the [`Generator`] trait every output variant implements, plus the
//! shared helpers variants use to render stubs and parse columns.

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ColumnSpec, Draft, ModelDefinition};
use std::fmt;

/// Produces candidate files from a draft
///
/// # Contract
/// - `generate` is a pure function of the context: the same draft and
///   conventions always yield the same candidates in the same order
/// - `generate` is never called when `supports` returns false
/// - Every candidate carries the ownership the generator was constructed with
pub trait Generator: Send + Sync + fmt::Debug {
    /// Registry name (`model`, `migration`, ...)
    fn name(&self) -> &'static str;

    /// Ownership stamped on every candidate
    fn ownership(&self) -> Ownership;

    /// Whether the draft has anything for this generator
    fn supports(&self, draft: &Draft) -> bool;

    /// Ordered candidates for the draft
    ///
    /// # Errors
    /// Returns [`GenerationError`] naming the entity that could not be rendered
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<Candidate>, GenerationError>;
}

/// Render stub `stub` for `entity`
///
/// # Errors
/// Returns [`GenerationError::MissingStub`] if the stub is not registered
pub fn render_stub(
    ctx: &GenerationContext<'_>,
    generator: &str,
    entity: &str,
    stub: &str,
    vars: &[(&str, &str)],
) -> Result<String, GenerationError> {
    ctx.stubs
        .render(stub, vars)
        .ok_or_else(|| GenerationError::MissingStub {
            generator: generator.to_string(),
            entity: entity.to_string(),
            stub: stub.to_string(),
        })
}

/// Parse every column of `model` in declaration order
///
/// # Errors
/// Returns [`GenerationError::InvalidColumn`] for the first bad column
pub fn parse_columns(
    generator: &str,
    model: &ModelDefinition,
) -> Result<Vec<ColumnSpec>, GenerationError> {
    model
        .columns
        .iter()
        .map(|(name, spec)| {
            ColumnSpec::parse(name, spec).map_err(|source| GenerationError::InvalidColumn {
                generator: generator.to_string(),
                entity: model.name.clone(),
                source,
            })
        })
        .collect()
}

/// Join rendered lines, each indented and newline-terminated
pub(crate) fn block(lines: impl IntoIterator<Item = String>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    lines
        .into_iter()
        .map(|line| format!("{pad}{line}\n"))
        .collect()
}
