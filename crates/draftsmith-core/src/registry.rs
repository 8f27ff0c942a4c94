//! Explicit registry of generators, stubs and validation rules
//!
//! Built once per [`Forge`](crate::Forge) and passed by reference; there is no
//! process-wide state.

use crate::config::ForgeConfig;
use draftsmith_draft::{builtin_rules, Draft, DraftIssue, ValidationRule};
use draftsmith_generators::{Generator, GeneratorRegistry, Stubs, UnknownGenerator};
use std::fmt;

/// Generators, stubs and validation rules of one forge
pub struct Registry {
    generators: GeneratorRegistry,
    stubs: Stubs,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Registry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: GeneratorRegistry::new(),
            stubs: Stubs::new(),
            rules: Vec::new(),
        }
    }

    /// Built-in generators, stubs and rules with no overrides
    #[must_use]
    pub fn with_builtins() -> Self {
        Self {
            generators: GeneratorRegistry::with_builtins(),
            stubs: Stubs::builtin(),
            rules: builtin_rules(),
        }
    }

    /// Built-ins with the configured ownership overrides and generator list
    ///
    /// # Errors
    /// Returns [`UnknownGenerator`] if `generators` names an unregistered one
    pub fn from_config(config: &ForgeConfig) -> Result<Self, UnknownGenerator> {
        let mut generators = GeneratorRegistry::with_ownership_overrides(&config.ownership);
        if let Some(enabled) = &config.generators {
            generators.retain_only(enabled)?;
        }
        Ok(Self {
            generators,
            stubs: Stubs::builtin(),
            rules: builtin_rules(),
        })
    }

    /// Add or replace a generator by name
    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        if let Some(previous) = self.generators.register(generator) {
            tracing::debug!(generator = previous.name(), "generator replaced");
        }
    }

    /// Add or replace a stub template
    pub fn register_stub(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.stubs.register(name, template);
    }

    /// Add a validation rule run by `validate`
    pub fn register_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Generator registry
    #[inline]
    #[must_use]
    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    /// Stub templates
    #[inline]
    #[must_use]
    pub fn stubs(&self) -> &Stubs {
        &self.stubs
    }

    /// Names of the registered rules, in run order
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule against `draft`
    #[must_use]
    pub fn check(&self, draft: &Draft) -> Vec<DraftIssue> {
        self.rules.iter().flat_map(|rule| rule.check(draft)).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("generators", &self.generators.names())
            .field("stubs", &self.stubs.names())
            .field("rules", &self.rule_names())
            .finish()
    }
}
