//! Build phase state machine
//!
//! `Idle → DraftLoading → ChangeCheck → Generating → Reconciling → Writing →
//! Persisting → Done`, with `Failed` reachable from every working phase and
//! `ChangeCheck → Done` for an up-to-date draft.

use std::fmt;

/// Orchestrator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPhase {
    /// Not started
    Idle,
    /// Resolving and parsing the draft
    DraftLoading,
    /// Comparing the draft hash with the ledger
    ChangeCheck,
    /// Running generators
    Generating,
    /// Deciding per candidate
    Reconciling,
    /// Writing files transactionally
    Writing,
    /// Updating the ledger
    Persisting,
    /// Finished successfully
    Done,
    /// Aborted
    Failed,
}

impl BuildPhase {
    /// Check if no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DraftLoading => "draft-loading",
            Self::ChangeCheck => "change-check",
            Self::Generating => "generating",
            Self::Reconciling => "reconciling",
            Self::Writing => "writing",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: BuildPhase) -> &'static [BuildPhase] {
    use BuildPhase::{
        ChangeCheck, Done, DraftLoading, Failed, Generating, Idle, Persisting, Reconciling,
        Writing,
    };
    match from {
        Idle => &[DraftLoading],
        DraftLoading => &[ChangeCheck, Failed],
        ChangeCheck => &[Generating, Done, Failed],
        Generating => &[Reconciling, Failed],
        Reconciling => &[Writing, Failed],
        Writing => &[Persisting, Failed],
        Persisting => &[Done],
        Done | Failed => &[],
    }
}

/// Illegal phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal build phase transition: {from} -> {to}")]
pub struct PhaseError {
    /// Current phase
    pub from: BuildPhase,
    /// Requested phase
    pub to: BuildPhase,
}

/// Validates a phase change
///
/// # Errors
/// Returns [`PhaseError`] if `to` is not reachable from `from`
pub fn validate_transition(from: BuildPhase, to: BuildPhase) -> Result<(), PhaseError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PhaseError { from, to })
    }
}

/// Tracks the current phase of one run
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: BuildPhase,
    history: Vec<BuildPhase>,
}

impl PhaseTracker {
    /// Create tracker in [`BuildPhase::Idle`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: BuildPhase::Idle,
            history: vec![BuildPhase::Idle],
        }
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn current(&self) -> BuildPhase {
        self.current
    }

    /// Every phase visited, in order
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[BuildPhase] {
        &self.history
    }

    /// Move to `to`
    ///
    /// # Errors
    /// Returns [`PhaseError`] for a transition not in the table
    pub fn advance(&mut self, to: BuildPhase) -> Result<(), PhaseError> {
        validate_transition(self.current, to)?;
        tracing::debug!(from = %self.current, to = %to, "build phase");
        self.current = to;
        self.history.push(to);
        Ok(())
    }

    /// Move to [`BuildPhase::Failed`] if the current phase allows it
    pub fn fail(&mut self) {
        if self.advance(BuildPhase::Failed).is_err() {
            tracing::debug!(phase = %self.current, "failure outside a working phase");
        }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
