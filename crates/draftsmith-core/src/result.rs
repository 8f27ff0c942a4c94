//! Build and plan outcomes

use crate::error::ForgeError;
use crate::reconcile::Decision;
use draftsmith_artifact::GeneratedFileRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// Per-run build options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Restrict to these generators; bypasses the unchanged-draft short circuit
    pub only: Option<Vec<String>>,
    /// Overwrite `scaffold_only` files that differ from the draft
    pub force: bool,
}

impl BuildOptions {
    /// Default options: all generators, no force
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `generators`
    #[must_use]
    pub fn with_only<I, S>(mut self, generators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(generators.into_iter().map(Into::into).collect());
        self
    }

    /// Set force
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Outcome of a build
///
/// `errors` non-empty implies `success == false` and an untouched ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    /// Files written this run with the records stored for them, in write order
    pub generated: IndexMap<PathBuf, GeneratedFileRecord>,
    /// Candidates left alone
    pub skipped: Vec<PathBuf>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
    /// Fatal problems
    pub errors: Vec<String>,
    /// Whether the run completed
    pub success: bool,
    /// Draft unchanged since the last run; nothing was generated
    pub up_to_date: bool,
    /// Per-candidate decisions
    pub decisions: Vec<Decision>,
}

impl BuildResult {
    /// Result of a short-circuited run
    #[must_use]
    pub fn up_to_date() -> Self {
        Self {
            success: true,
            up_to_date: true,
            ..Self::default()
        }
    }

    /// Result of a failed run
    #[must_use]
    pub fn failed(err: &ForgeError) -> Self {
        Self {
            errors: vec![err.to_string()],
            ..Self::default()
        }
    }

    /// Process exit code: 0 on success, 1 otherwise
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.success)
    }
}

/// Read-only preview of a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    /// Draft unchanged since the last run
    pub up_to_date: bool,
    /// What a build would do per candidate
    pub decisions: Vec<Decision>,
    /// Warnings a build would emit
    pub warnings: Vec<String>,
}

impl PlanResult {
    /// Paths a build would write
    #[must_use]
    pub fn writes(&self) -> Vec<&PathBuf> {
        self.decisions
            .iter()
            .filter(|d| d.action.is_write())
            .map(|d| &d.path)
            .collect()
    }
}
