//! Orchestrator configuration
//!
//! Loaded from `draftsmith.toml`; every key is optional. Relative paths
//! resolve against `output_root`, which is made absolute before a build so
//! ledger keys do not depend on the working directory.

use crate::error::ConfigError;
use draftsmith_artifact::Ownership;
use draftsmith_generators::Conventions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Default config file name
pub const CONFIG_FILE: &str = "draftsmith.toml";

/// Build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Draft used when a build names none
    pub draft_path: PathBuf,
    /// Ledger location
    pub ledger_path: PathBuf,
    /// Directory generated paths are relative to
    pub output_root: PathBuf,
    /// Ledger save attempts before downgrading to a warning
    pub ledger_persist_attempts: u32,
    /// Package whose conventions are looked up
    pub package: String,
    /// Naming and layout
    pub conventions: Conventions,
    /// Per-generator ownership overrides
    pub ownership: BTreeMap<String, Ownership>,
    /// Enabled generators; `None` enables all
    pub generators: Option<Vec<String>>,
}

impl ForgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path`
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `<dir>/draftsmith.toml` if present, defaults otherwise
    ///
    /// The output root defaults to `dir`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an unreadable or invalid file
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)?
        } else {
            Self::default()
        };
        if config.output_root.is_relative() {
            config.output_root = dir.join(&config.output_root);
        }
        config.absolutize_output_root()
    }

    /// Make the output root absolute and lexically normal
    ///
    /// A relative root is joined to the current directory; `.` and `..`
    /// components are folded.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutputRoot`] if the current directory is
    /// unavailable
    pub fn absolutize_output_root(mut self) -> Result<Self, ConfigError> {
        let joined = if self.output_root.is_absolute() {
            self.output_root.clone()
        } else {
            let cwd = std::env::current_dir().map_err(|source| ConfigError::OutputRoot {
                path: self.output_root.clone(),
                source,
            })?;
            cwd.join(&self.output_root)
        };
        let mut normal = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normal.pop();
                }
                other => normal.push(other),
            }
        }
        self.output_root = normal;
        Ok(self)
    }

    /// Check value constraints
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger_persist_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "ledger_persist_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(generators) = &self.generators {
            if generators.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "generators".to_string(),
                    message: "list is empty; omit it to enable all generators".to_string(),
                });
            }
        }
        Ok(())
    }

    /// With output root
    #[inline]
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// With default draft path
    #[inline]
    #[must_use]
    pub fn with_draft_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.draft_path = path.into();
        self
    }

    /// With ledger path
    #[inline]
    #[must_use]
    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    /// With ledger save attempts
    #[inline]
    #[must_use]
    pub fn with_ledger_persist_attempts(mut self, attempts: u32) -> Self {
        self.ledger_persist_attempts = attempts;
        self
    }

    /// With conventions
    #[inline]
    #[must_use]
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// With ownership override for one generator
    #[inline]
    #[must_use]
    pub fn with_ownership(mut self, generator: impl Into<String>, ownership: Ownership) -> Self {
        self.ownership.insert(generator.into(), ownership);
        self
    }

    /// With enabled generator list
    #[inline]
    #[must_use]
    pub fn with_generators(mut self, generators: Vec<String>) -> Self {
        self.generators = Some(generators);
        self
    }

    /// Absolute form of `path` under the output root
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_root.join(path)
        }
    }

    /// Draft to use: `explicit` or the configured default, resolved
    #[must_use]
    pub fn resolve_draft_path(&self, explicit: Option<&Path>) -> PathBuf {
        self.resolve(explicit.unwrap_or(&self.draft_path))
    }

    /// Resolved ledger location
    #[must_use]
    pub fn resolved_ledger_path(&self) -> PathBuf {
        self.resolve(&self.ledger_path)
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            draft_path: PathBuf::from("draft.yaml"),
            ledger_path: PathBuf::from(".draftsmith/ledger.json"),
            output_root: PathBuf::from("."),
            ledger_persist_attempts: 2,
            package: "laravel/framework".to_string(),
            conventions: Conventions::default(),
            ownership: BTreeMap::new(),
            generators: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ForgeConfig::new();
        assert_eq!(config.draft_path, PathBuf::from("draft.yaml"));
        assert_eq!(config.ledger_path, PathBuf::from(".draftsmith/ledger.json"));
        assert_eq!(config.ledger_persist_attempts, 2);
        assert!(config.generators.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_and_resolution() {
        let config = ForgeConfig::new()
            .with_output_root("/project")
            .with_draft_path("schema/draft.yaml")
            .with_ownership("controller", Ownership::Regenerate);
        assert_eq!(
            config.resolve_draft_path(None),
            PathBuf::from("/project/schema/draft.yaml")
        );
        assert_eq!(
            config.resolve_draft_path(Some(Path::new("/elsewhere/d.yaml"))),
            PathBuf::from("/elsewhere/d.yaml")
        );
        assert_eq!(
            config.resolved_ledger_path(),
            PathBuf::from("/project/.draftsmith/ledger.json")
        );
        assert_eq!(config.ownership["controller"], Ownership::Regenerate);
    }

    #[test]
    fn load_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
draft_path = "blueprint.yaml"
generators = ["model", "migration"]

[ownership]
page = "regenerate"

[conventions]
models_dir = "src/Models"
"#,
        )
        .unwrap();

        let config = ForgeConfig::discover(dir.path()).unwrap();
        assert_eq!(config.draft_path, PathBuf::from("blueprint.yaml"));
        assert_eq!(config.output_root, dir.path());
        assert_eq!(config.ownership["page"], Ownership::Regenerate);
        assert_eq!(config.conventions.models_dir, PathBuf::from("src/Models"));
        assert_eq!(
            config.conventions.migrations_dir,
            PathBuf::from("database/migrations")
        );
        assert_eq!(
            config.generators,
            Some(vec!["model".to_string(), "migration".to_string()])
        );
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ForgeConfig::discover(dir.path()).unwrap();
        assert_eq!(config.ledger_persist_attempts, 2);
    }

    #[test]
    fn relative_output_root_becomes_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let config = ForgeConfig::new()
            .with_output_root("./site/../project/.")
            .absolutize_output_root()
            .unwrap();
        assert!(config.output_root.is_absolute());
        assert_eq!(config.output_root, cwd.join("project"));
        assert_eq!(
            config.resolved_ledger_path(),
            cwd.join("project/.draftsmith/ledger.json")
        );

        let config = ForgeConfig::new()
            .with_output_root("/srv/app/./web/..")
            .absolutize_output_root()
            .unwrap();
        assert_eq!(config.output_root, PathBuf::from("/srv/app"));
    }

    #[test]
    fn zero_attempts_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "ledger_persist_attempts = 0\n").unwrap();
        let err = ForgeConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("ledger_persist_attempts"));
    }

    #[test]
    fn bad_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "draft_path = [").unwrap();
        let err = ForgeConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
