//! Build orchestrator
//!
//! [`Forge`] drives one build through the [`BuildPhase`] state machine:
//!
//! 1. **DraftLoading**: resolve and parse the draft, hash its raw bytes
//! 2. **ChangeCheck**: load the ledger once; an unchanged draft with no `only`
//!    restriction finishes here
//! 3. **Generating**: run every selected generator that supports the draft;
//!    the first [`GenerationError`](draftsmith_generators::GenerationError)
//!    aborts the run before any write
//! 4. **Reconciling**: decide write or skip per candidate
//! 5. **Writing**: write transactionally, rolling back on the first failure
//! 6. **Persisting**: save the ledger once; failure becomes a warning
//!
//! [`Forge::plan`] runs steps 1 to 4 without side effects and so reaches the
//! same decisions as a build over the same inputs.

use crate::config::ForgeConfig;
use crate::conventions::{ConventionSource, StaticConventions};
use crate::error::ForgeError;
use crate::fs::{Filesystem, LocalFilesystem};
use crate::phase::{BuildPhase, PhaseTracker};
use crate::reconcile::Reconciler;
use crate::registry::Registry;
use crate::result::{BuildOptions, BuildResult, PlanResult};
use crate::transaction::WriteTransaction;
use chrono::Utc;
use draftsmith_artifact::{ContentHash, GeneratedFileRecord};
use draftsmith_draft::{Draft, DraftParser};
use draftsmith_generators::{Candidate, GenerationContext, TableIndex};
use draftsmith_ledger::{ChangeDetector, LedgerState, LedgerStore};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A parsed draft with its identity
struct LoadedDraft {
    path: PathBuf,
    draft: Draft,
    hash: ContentHash,
}

/// Build orchestrator
#[derive(Debug)]
pub struct Forge {
    config: ForgeConfig,
    registry: Registry,
    ledger: LedgerStore,
    fs: Box<dyn Filesystem>,
    conventions: Box<dyn ConventionSource>,
    parser: DraftParser,
}

impl Forge {
    /// Create forge from validated configuration
    ///
    /// The output root is made absolute first, so every ledger key is an
    /// absolute path.
    ///
    /// # Errors
    /// Returns [`ForgeError::Config`] for invalid values or an unresolvable
    /// output root, and
    /// [`ForgeError::UnknownGenerator`] if the generator list names an
    /// unknown generator
    pub fn new(config: ForgeConfig) -> Result<Self, ForgeError> {
        config.validate()?;
        let config = config.absolutize_output_root()?;
        let registry = Registry::from_config(&config)?;
        let ledger = LedgerStore::new(config.resolved_ledger_path(), crate::VERSION);
        let conventions = StaticConventions::new(config.conventions.clone());
        Ok(Self {
            config,
            registry,
            ledger,
            fs: Box::new(LocalFilesystem),
            conventions: Box::new(conventions),
            parser: DraftParser::new(),
        })
    }

    /// Replace the registry
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the output filesystem
    #[must_use]
    pub fn with_filesystem(mut self, fs: Box<dyn Filesystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the convention source
    #[must_use]
    pub fn with_convention_source(mut self, source: Box<dyn ConventionSource>) -> Self {
        self.conventions = source;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registry, for registering generators, stubs and rules
    #[inline]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Ledger store
    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Run a build, folding any fatal error into the result
    #[must_use]
    pub fn build(&self, draft_path: Option<&Path>, options: &BuildOptions) -> BuildResult {
        self.try_build(draft_path, options)
            .unwrap_or_else(|err| BuildResult::failed(&err))
    }

    /// Run a build
    ///
    /// # Errors
    /// Returns the fatal [`ForgeError`]; the ledger is untouched and, for
    /// write failures, files written earlier in the run are restored
    pub fn try_build(
        &self,
        draft_path: Option<&Path>,
        options: &BuildOptions,
    ) -> Result<BuildResult, ForgeError> {
        let mut phases = PhaseTracker::new();
        let outcome = self.run_build(&mut phases, draft_path, options);
        if let Err(err) = &outcome {
            phases.fail();
            tracing::error!(phase = %phases.current(), error = %err, "build failed");
        }
        outcome
    }

    fn run_build(
        &self,
        phases: &mut PhaseTracker,
        draft_path: Option<&Path>,
        options: &BuildOptions,
    ) -> Result<BuildResult, ForgeError> {
        phases.advance(BuildPhase::DraftLoading)?;
        let loaded = self.load_draft(draft_path)?;
        tracing::info!(draft = %loaded.path.display(), hash = %loaded.hash.short(), "build started");

        phases.advance(BuildPhase::ChangeCheck)?;
        let state = self.ledger.load()?;
        if options.only.is_none()
            && !ChangeDetector::new(&state).has_draft_changed(&loaded.path, &loaded.hash)
        {
            tracing::info!(draft = %loaded.path.display(), "draft unchanged, nothing to do");
            phases.advance(BuildPhase::Done)?;
            return Ok(BuildResult::up_to_date());
        }

        phases.advance(BuildPhase::Generating)?;
        let candidates = self.generate(&loaded, &state, options.only.as_deref())?;

        phases.advance(BuildPhase::Reconciling)?;
        let reconciliation = Reconciler::new(&state, options.force).reconcile(&candidates);

        phases.advance(BuildPhase::Writing)?;
        self.write_all(&reconciliation.writes)?;
        let generated: IndexMap<PathBuf, GeneratedFileRecord> = reconciliation
            .writes
            .iter()
            .map(|candidate| (candidate.path.clone(), candidate.to_record()))
            .collect();

        phases.advance(BuildPhase::Persisting)?;
        let mut records = state.generated.clone();
        for (path, record) in &generated {
            records.insert(path.clone(), record.clone());
        }
        let mut next = state;
        next.apply_run(&loaded.path, loaded.hash, records, crate::VERSION, Utc::now());

        let mut warnings = reconciliation.warnings;
        if let Err(err) = self.persist(&next) {
            tracing::warn!(error = %err, "ledger not updated");
            warnings.push(err.to_string());
        }
        phases.advance(BuildPhase::Done)?;

        let skipped: Vec<PathBuf> = reconciliation
            .decisions
            .iter()
            .filter(|d| !d.action.is_write())
            .map(|d| d.path.clone())
            .collect();
        tracing::info!(
            generated = generated.len(),
            skipped = skipped.len(),
            warnings = warnings.len(),
            "build complete"
        );
        Ok(BuildResult {
            generated,
            skipped,
            warnings,
            errors: Vec::new(),
            success: true,
            up_to_date: false,
            decisions: reconciliation.decisions,
        })
    }

    /// Preview a default build
    ///
    /// # Errors
    /// Same pre-write errors as [`Forge::try_build`]
    pub fn plan(&self, draft_path: Option<&Path>) -> Result<PlanResult, ForgeError> {
        self.plan_with(draft_path, &BuildOptions::default())
    }

    /// Preview a build with `options`; never writes files or the ledger
    ///
    /// # Errors
    /// Same pre-write errors as [`Forge::try_build`]
    pub fn plan_with(
        &self,
        draft_path: Option<&Path>,
        options: &BuildOptions,
    ) -> Result<PlanResult, ForgeError> {
        let loaded = self.load_draft(draft_path)?;
        let state = self.ledger.load()?;
        if options.only.is_none()
            && !ChangeDetector::new(&state).has_draft_changed(&loaded.path, &loaded.hash)
        {
            return Ok(PlanResult {
                up_to_date: true,
                ..PlanResult::default()
            });
        }
        let candidates = self.generate(&loaded, &state, options.only.as_deref())?;
        let reconciliation = Reconciler::new(&state, options.force).reconcile(&candidates);
        Ok(PlanResult {
            up_to_date: false,
            decisions: reconciliation.decisions,
            warnings: reconciliation.warnings,
        })
    }

    /// Every problem with the draft; empty means valid
    #[must_use]
    pub fn validate(&self, draft_path: Option<&Path>) -> Vec<String> {
        let path = self.config.resolve_draft_path(draft_path);
        match self.parser.parse(&path) {
            Ok(draft) => self
                .registry
                .check(&draft)
                .iter()
                .map(ToString::to_string)
                .collect(),
            Err(err) => vec![ForgeError::from(err).to_string()],
        }
    }

    fn load_draft(&self, draft_path: Option<&Path>) -> Result<LoadedDraft, ForgeError> {
        let path = self.config.resolve_draft_path(draft_path);
        let draft = self.parser.parse(&path)?;
        let hash = ChangeDetector::compute_draft_hash(&path).map_err(|source| {
            ForgeError::DraftRead {
                path: path.clone(),
                source,
            }
        })?;
        Ok(LoadedDraft { path, draft, hash })
    }

    fn generate(
        &self,
        loaded: &LoadedDraft,
        state: &LedgerState,
        only: Option<&[String]>,
    ) -> Result<Vec<Candidate>, ForgeError> {
        let selected = self.registry.generators().select(only)?;
        let conventions = self
            .conventions
            .conventions_for(&self.config.package)
            .unwrap_or_else(|| self.config.conventions.clone());
        let tables = TableIndex::from(state.table_index());
        let ctx = GenerationContext {
            draft: &loaded.draft,
            draft_path: &loaded.path,
            output_root: &self.config.output_root,
            conventions: &conventions,
            stubs: self.registry.stubs(),
            tables: &tables,
        };

        let mut candidates = Vec::new();
        let mut owners: HashMap<PathBuf, String> = HashMap::new();
        for generator in selected {
            if !generator.supports(&loaded.draft) {
                tracing::debug!(generator = generator.name(), "not applicable");
                continue;
            }
            let produced = generator.generate(&ctx)?;
            tracing::debug!(generator = generator.name(), candidates = produced.len(), "generated");
            // explicit config overrides beat framework defaults
            let framework_ownership = conventions
                .ownership_for(generator.name())
                .filter(|_| !self.config.ownership.contains_key(generator.name()));
            for mut candidate in produced {
                if let Some(ownership) = framework_ownership {
                    candidate.ownership = ownership;
                }
                if let Some(first) = owners.insert(candidate.path.clone(), candidate.generator.clone())
                {
                    return Err(ForgeError::DuplicateTarget {
                        path: candidate.path,
                        first,
                        second: candidate.generator,
                    });
                }
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }

    fn write_all(&self, writes: &[&Candidate]) -> Result<(), ForgeError> {
        let mut tx = WriteTransaction::new(&*self.fs);
        for candidate in writes {
            if let Err(source) = tx.write(&candidate.path, candidate.content.as_bytes()) {
                tracing::error!(
                    path = %candidate.path.display(),
                    error = %source,
                    touched = tx.len(),
                    "write failed, rolling back"
                );
                let report = tx.rollback();
                return Err(ForgeError::write_error(
                    candidate.path.clone(),
                    source,
                    report.restored.len(),
                    report.failed,
                ));
            }
            tracing::info!(
                path = %candidate.path.display(),
                generator = %candidate.generator,
                "wrote"
            );
        }
        let written = tx.commit();
        tracing::debug!(files = written.len(), "writes committed");
        Ok(())
    }

    fn persist(&self, state: &LedgerState) -> Result<(), ForgeError> {
        let attempts = self.config.ledger_persist_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.ledger.save(state) {
                Ok(()) => return Ok(()),
                Err(source) if attempt >= attempts => {
                    return Err(ForgeError::LedgerPersist {
                        path: self.ledger.path().to_path_buf(),
                        attempts,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "ledger save failed, retrying");
                    attempt += 1;
                }
            }
        }
    }
}
