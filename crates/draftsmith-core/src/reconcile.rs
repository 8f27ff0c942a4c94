//! Candidate reconciliation
//!
//! Decides, per candidate, whether to write or skip by comparing its content
//! hash and the ledger record's ownership. Shared by build and plan so both
//! always reach the same decisions.

use draftsmith_artifact::{ContentHash, Ownership};
use draftsmith_generators::Candidate;
use draftsmith_ledger::LedgerState;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why a candidate is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteReason {
    /// No ledger record
    New,
    /// `regenerate` record with a different hash
    Changed,
    /// `scaffold_only` record overridden by `force`
    Forced,
}

/// Why a candidate is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `regenerate` record whose hash equals the candidate hash
    Unchanged,
    /// `scaffold_only` record and no `force`
    Protected,
}

/// Outcome for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "action", content = "reason", rename_all = "snake_case")]
pub enum DecisionAction {
    /// Write the file
    Write(WriteReason),
    /// Leave the file alone
    Skip(SkipReason),
}

impl DecisionAction {
    /// Check if the candidate will be written
    #[inline]
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write(_))
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(WriteReason::New) => f.write_str("create"),
            Self::Write(WriteReason::Changed) => f.write_str("update"),
            Self::Write(WriteReason::Forced) => f.write_str("overwrite (forced)"),
            Self::Skip(SkipReason::Unchanged) => f.write_str("unchanged"),
            Self::Skip(SkipReason::Protected) => f.write_str("skip (scaffold_only)"),
        }
    }
}

/// Reconciliation result for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Decision {
    /// Target path
    pub path: PathBuf,
    /// Generator that produced the candidate
    pub generator: String,
    /// What happens to it
    pub action: DecisionAction,
}

/// Candidates split into decisions, writes and warnings
#[derive(Debug, Default)]
pub struct Reconciliation<'c> {
    /// One decision per candidate, in candidate order
    pub decisions: Vec<Decision>,
    /// Candidates to write, in candidate order
    pub writes: Vec<&'c Candidate>,
    /// Ownership warnings
    pub warnings: Vec<String>,
}

/// Applies the ownership rules against a ledger snapshot
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    state: &'a LedgerState,
    force: bool,
}

impl<'a> Reconciler<'a> {
    /// Create reconciler over `state`
    #[must_use]
    pub fn new(state: &'a LedgerState, force: bool) -> Self {
        Self { state, force }
    }

    /// Decide one candidate, with a warning for protected skips
    #[must_use]
    pub fn decide(&self, candidate: &Candidate) -> (DecisionAction, Option<String>) {
        let Some(record) = self.state.record(&candidate.path) else {
            return (DecisionAction::Write(WriteReason::New), None);
        };
        match record.ownership {
            Ownership::Regenerate => {
                let hash: ContentHash = candidate.content_hash();
                if record.content_hash == hash {
                    (DecisionAction::Skip(SkipReason::Unchanged), None)
                } else {
                    (DecisionAction::Write(WriteReason::Changed), None)
                }
            }
            // scaffold_only ignores the recorded hash
            Ownership::ScaffoldOnly if self.force => {
                (DecisionAction::Write(WriteReason::Forced), None)
            }
            Ownership::ScaffoldOnly => (
                DecisionAction::Skip(SkipReason::Protected),
                Some(format!(
                    "{} is scaffold_only; skipped (use force to overwrite)",
                    candidate.path.display()
                )),
            ),
        }
    }

    /// Decide every candidate in order
    #[must_use]
    pub fn reconcile<'c>(&self, candidates: &'c [Candidate]) -> Reconciliation<'c> {
        let mut out = Reconciliation::default();
        for candidate in candidates {
            let (action, warning) = self.decide(candidate);
            tracing::debug!(
                path = %candidate.path.display(),
                generator = %candidate.generator,
                decision = %action,
                "reconciled"
            );
            if action.is_write() {
                out.writes.push(candidate);
            }
            if let Some(warning) = warning {
                tracing::warn!("{warning}");
                out.warnings.push(warning);
            }
            out.decisions.push(Decision {
                path: candidate.path.clone(),
                generator: candidate.generator.clone(),
                action,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_artifact::{hash_text, GeneratedFileRecord};

    fn candidate(path: &str, content: &str, ownership: Ownership) -> Candidate {
        Candidate::new("model", path, content, ownership)
    }

    fn state_with(path: &str, content: &str, ownership: Ownership) -> LedgerState {
        let mut state = LedgerState::default();
        state.generated.insert(
            PathBuf::from(path),
            GeneratedFileRecord::new(path, hash_text(content), ownership),
        );
        state
    }

    #[test]
    fn no_record_writes() {
        let state = LedgerState::default();
        let (action, warning) = Reconciler::new(&state, false)
            .decide(&candidate("/a.php", "x", Ownership::ScaffoldOnly));
        assert_eq!(action, DecisionAction::Write(WriteReason::New));
        assert!(warning.is_none());
    }

    #[test]
    fn identical_hash_skips_regenerate_silently() {
        let state = state_with("/a.php", "x", Ownership::Regenerate);
        for force in [false, true] {
            let (action, warning) = Reconciler::new(&state, force)
                .decide(&candidate("/a.php", "x", Ownership::Regenerate));
            assert_eq!(action, DecisionAction::Skip(SkipReason::Unchanged));
            assert!(warning.is_none());
        }
    }

    #[test]
    fn identical_hash_does_not_bypass_scaffold_only_rules() {
        let state = state_with("/a.php", "x", Ownership::ScaffoldOnly);
        let c = candidate("/a.php", "x", Ownership::ScaffoldOnly);

        let (action, warning) = Reconciler::new(&state, false).decide(&c);
        assert_eq!(action, DecisionAction::Skip(SkipReason::Protected));
        assert!(warning.unwrap().contains("/a.php"));

        let (action, warning) = Reconciler::new(&state, true).decide(&c);
        assert_eq!(action, DecisionAction::Write(WriteReason::Forced));
        assert!(warning.is_none());
    }

    #[test]
    fn regenerate_changed_writes() {
        let state = state_with("/a.php", "x", Ownership::Regenerate);
        let (action, _) = Reconciler::new(&state, false)
            .decide(&candidate("/a.php", "y", Ownership::Regenerate));
        assert_eq!(action, DecisionAction::Write(WriteReason::Changed));
    }

    #[test]
    fn scaffold_only_protected_unless_forced() {
        let state = state_with("/a.php", "x", Ownership::ScaffoldOnly);
        let c = candidate("/a.php", "y", Ownership::ScaffoldOnly);

        let (action, warning) = Reconciler::new(&state, false).decide(&c);
        assert_eq!(action, DecisionAction::Skip(SkipReason::Protected));
        assert!(warning.unwrap().contains("/a.php"));

        let (action, warning) = Reconciler::new(&state, true).decide(&c);
        assert_eq!(action, DecisionAction::Write(WriteReason::Forced));
        assert!(warning.is_none());
    }

    #[test]
    fn reconcile_keeps_order_and_collects_writes() {
        let state = state_with("/b.php", "x", Ownership::ScaffoldOnly);
        let candidates = vec![
            candidate("/a.php", "a", Ownership::Regenerate),
            candidate("/b.php", "changed", Ownership::ScaffoldOnly),
            candidate("/c.php", "c", Ownership::Regenerate),
        ];
        let out = Reconciler::new(&state, false).reconcile(&candidates);
        assert_eq!(out.decisions.len(), 3);
        assert_eq!(out.writes.len(), 2);
        assert_eq!(out.writes[1].path, PathBuf::from("/c.php"));
        assert_eq!(out.warnings.len(), 1);
    }
}
