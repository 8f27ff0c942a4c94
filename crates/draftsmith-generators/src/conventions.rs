//! Framework conventions
//!
//! Namespaces, directory layout and ownership defaults handed to generators.
//! All directories are relative to the output root.

use draftsmith_artifact::Ownership;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Naming and layout conventions of the target framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Root application namespace
    pub namespace: String,
    /// Model classes
    pub models_dir: PathBuf,
    /// Schema migrations
    pub migrations_dir: PathBuf,
    /// Model factories
    pub factories_dir: PathBuf,
    /// Database seeders
    pub seeders_dir: PathBuf,
    /// Action classes
    pub actions_dir: PathBuf,
    /// Web controllers
    pub controllers_dir: PathBuf,
    /// API controllers
    pub api_controllers_dir: PathBuf,
    /// Form requests
    pub requests_dir: PathBuf,
    /// Web routes file
    pub routes_file: PathBuf,
    /// Frontend pages
    pub pages_dir: PathBuf,
    /// Frontend type definitions
    pub types_dir: PathBuf,
    /// Feature tests
    pub tests_dir: PathBuf,
    /// Extension of generated page components
    pub page_extension: String,
    /// Framework ownership defaults by generator name
    pub ownership: BTreeMap<String, Ownership>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            namespace: "App".to_string(),
            models_dir: PathBuf::from("app/Models"),
            migrations_dir: PathBuf::from("database/migrations"),
            factories_dir: PathBuf::from("database/factories"),
            seeders_dir: PathBuf::from("database/seeders"),
            actions_dir: PathBuf::from("app/Actions"),
            controllers_dir: PathBuf::from("app/Http/Controllers"),
            api_controllers_dir: PathBuf::from("app/Http/Controllers/Api"),
            requests_dir: PathBuf::from("app/Http/Requests"),
            routes_file: PathBuf::from("routes/web.php"),
            pages_dir: PathBuf::from("resources/js/Pages"),
            types_dir: PathBuf::from("resources/js/types"),
            tests_dir: PathBuf::from("tests/Feature"),
            page_extension: "tsx".to_string(),
            ownership: BTreeMap::new(),
        }
    }
}

impl Conventions {
    /// Namespace for a sub-path, e.g. `sub_namespace("Models")` → `App\Models`
    #[must_use]
    pub fn sub_namespace(&self, sub: &str) -> String {
        if sub.is_empty() {
            self.namespace.clone()
        } else {
            format!("{}\\{sub}", self.namespace)
        }
    }

    /// Framework ownership default for `generator`, if any
    #[inline]
    #[must_use]
    pub fn ownership_for(&self, generator: &str) -> Option<Ownership> {
        self.ownership.get(generator).copied()
    }

    /// With an ownership default for one generator
    #[must_use]
    pub fn with_ownership(mut self, generator: impl Into<String>, ownership: Ownership) -> Self {
        self.ownership.insert(generator.into(), ownership);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Conventions::default();
        assert_eq!(c.models_dir, PathBuf::from("app/Models"));
        assert_eq!(c.sub_namespace("Models"), "App\\Models");
        assert_eq!(c.sub_namespace(""), "App");
        assert_eq!(c.ownership_for("model"), None);
    }

    #[test]
    fn ownership_defaults_from_toml() {
        let c: Conventions = toml::from_str("[ownership]\nmodel = \"scaffold_only\"\n").unwrap();
        assert_eq!(c.ownership_for("model"), Some(Ownership::ScaffoldOnly));
        assert_eq!(c.models_dir, PathBuf::from("app/Models"));
    }
}
