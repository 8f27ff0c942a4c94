//! Generator registry
//!
//! Provides [`GeneratorRegistry`], the name → implementation map the build
//! selects its active generators from.

use crate::error::UnknownGenerator;
use crate::generator::Generator;
use crate::variants::{builtin, default_ownership, BUILTIN_NAMES};
use draftsmith_artifact::Ownership;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Registered generators in generation order
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: IndexMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: IndexMap::new(),
        }
    }

    /// Create registry with every built-in variant at its default ownership
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_ownership_overrides(&BTreeMap::new())
    }

    /// Create registry with every built-in variant, applying per-name ownership overrides
    #[must_use]
    pub fn with_ownership_overrides(overrides: &BTreeMap<String, Ownership>) -> Self {
        for name in overrides.keys() {
            if !BUILTIN_NAMES.contains(&name.as_str()) {
                tracing::warn!(generator = %name, "ownership override for unknown generator ignored");
            }
        }
        let mut registry = Self::new();
        for name in BUILTIN_NAMES {
            let ownership = overrides
                .get(*name)
                .copied()
                .or_else(|| default_ownership(name))
                .unwrap_or(Ownership::ScaffoldOnly);
            if let Some(generator) = builtin(name, ownership) {
                registry.register(generator);
            }
        }
        registry
    }

    /// Register a generator, replacing any with the same name
    ///
    /// A replacement keeps the original position in generation order.
    pub fn register(&mut self, generator: Box<dyn Generator>) -> Option<Box<dyn Generator>> {
        self.generators
            .insert(generator.name().to_string(), generator)
    }

    /// Remove generator by name
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Generator>> {
        self.generators.shift_remove(name)
    }

    /// Look up generator by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|g| &**g)
    }

    /// Check if generator exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names in generation order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.generators.keys().map(String::as_str).collect()
    }

    /// Get number of registered generators
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Iterate over generators in generation order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.values().map(|g| &**g)
    }

    /// Keep only the named generators
    ///
    /// # Errors
    /// Returns [`UnknownGenerator`] for the first name that is not registered;
    /// the registry is unchanged in that case
    pub fn retain_only(&mut self, enabled: &[String]) -> Result<(), UnknownGenerator> {
        self.check_known(enabled)?;
        self.generators
            .retain(|name, _| enabled.iter().any(|e| e == name));
        Ok(())
    }

    /// Active generators for a run
    ///
    /// `None` selects every registered generator. An allow-list keeps
    /// registry order regardless of the order names were given in.
    ///
    /// # Errors
    /// Returns [`UnknownGenerator`] if `only` names an unregistered generator
    pub fn select(&self, only: Option<&[String]>) -> Result<Vec<&dyn Generator>, UnknownGenerator> {
        match only {
            None => Ok(self.iter().collect()),
            Some(names) => {
                self.check_known(names)?;
                Ok(self
                    .generators
                    .iter()
                    .filter(|(name, _)| names.iter().any(|n| n == *name))
                    .map(|(_, generator)| &**generator)
                    .collect())
            }
        }
    }

    fn check_known(&self, names: &[String]) -> Result<(), UnknownGenerator> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(unknown) => Err(UnknownGenerator {
                name: unknown.clone(),
                known: self.names().into_iter().map(str::to_string).collect(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::ModelGenerator;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_new_empty() {
        let registry = GeneratorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_builtins() {
        let registry = GeneratorRegistry::with_builtins();
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.names()[0], "model");
        assert!(registry.contains("api-controller"));
        assert_eq!(
            registry.get("seeder").unwrap().ownership(),
            Ownership::ScaffoldOnly
        );
    }

    #[test]
    fn registry_ownership_override() {
        let mut overrides = BTreeMap::new();
        overrides.insert("controller".to_string(), Ownership::Regenerate);
        let registry = GeneratorRegistry::with_ownership_overrides(&overrides);
        assert_eq!(
            registry.get("controller").unwrap().ownership(),
            Ownership::Regenerate
        );
    }

    #[test]
    fn registry_register_replaces_in_place() {
        let mut registry = GeneratorRegistry::with_builtins();
        let previous = registry.register(Box::new(ModelGenerator::new(Ownership::ScaffoldOnly)));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.names()[0], "model");
        assert_eq!(
            registry.get("model").unwrap().ownership(),
            Ownership::ScaffoldOnly
        );
    }

    #[test]
    fn registry_select_keeps_registry_order() {
        let registry = GeneratorRegistry::with_builtins();
        let only = vec!["test".to_string(), "model".to_string()];
        let names: Vec<_> = registry
            .select(Some(only.as_slice()))
            .unwrap()
            .iter()
            .map(|g| g.name())
            .collect();
        assert_eq!(names, vec!["model", "test"]);
        assert_eq!(registry.select(None).unwrap().len(), 12);
    }

    #[test]
    fn registry_select_unknown() {
        let registry = GeneratorRegistry::with_builtins();
        let err = registry
            .select(Some(&["modle".to_string()][..]))
            .unwrap_err();
        assert_eq!(err.name, "modle");
        assert!(err.known.contains(&"model".to_string()));
    }

    #[test]
    fn registry_retain_only() {
        let mut registry = GeneratorRegistry::with_builtins();
        registry
            .retain_only(&["model".to_string(), "migration".to_string()])
            .unwrap();
        assert_eq!(registry.names(), vec!["model", "migration"]);
        assert!(registry.retain_only(&["page".to_string()]).is_err());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_remove() {
        let mut registry = GeneratorRegistry::with_builtins();
        assert!(registry.remove("route").is_some());
        assert!(!registry.contains("route"));
    }
}
