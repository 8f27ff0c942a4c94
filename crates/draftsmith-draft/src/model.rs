//! Draft Model
//!
//! In-memory representation of a parsed draft. Pure data; the only behavior
//! is lookup and conversion back to the on-disk YAML shape.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Default schema version tag
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0";

/// Keys inside a model mapping that are not columns
pub const RESERVED_MODEL_KEYS: &[&str] = &[
    "relationships",
    "seeder",
    "softDeletes",
    "soft_deletes",
    "timestamps",
    "traits",
];

/// Immutable parsed draft
///
/// Maps preserve insertion order so that generation order follows the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    /// Schema version tag
    pub schema_version: String,
    /// Models by name
    pub models: IndexMap<String, ModelDefinition>,
    /// Actions by name
    pub actions: IndexMap<String, ActionDefinition>,
    /// Pages by name
    pub pages: IndexMap<String, PageDefinition>,
    /// Route overrides: URI → page name
    pub routes: IndexMap<String, String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            models: IndexMap::new(),
            actions: IndexMap::new(),
            pages: IndexMap::new(),
            routes: IndexMap::new(),
        }
    }
}

impl Draft {
    /// True when models, actions and pages are all empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.actions.is_empty() && self.pages.is_empty()
    }

    /// Look up a model by name
    #[inline]
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    /// Look up an action by name
    #[inline]
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.get(name)
    }

    /// Look up a page by name
    #[inline]
    #[must_use]
    pub fn page(&self, name: &str) -> Option<&PageDefinition> {
        self.pages.get(name)
    }

    /// Route URI overriding the default for `page`, if any
    #[must_use]
    pub fn route_for_page(&self, page: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|(_, target)| target.as_str() == page)
            .map(|(uri, _)| uri.as_str())
    }

    /// Overlay `other` on top of this draft
    ///
    /// Entries from `other` replace same-named entries; new entries are
    /// appended in `other`'s order. The schema version of `other` wins.
    #[must_use]
    pub fn merged_with(&self, other: &Draft) -> Draft {
        let mut merged = self.clone();
        merged.schema_version = other.schema_version.clone();
        for (name, model) in &other.models {
            merged.models.insert(name.clone(), model.clone());
        }
        for (name, action) in &other.actions {
            merged.actions.insert(name.clone(), action.clone());
        }
        for (name, page) in &other.pages {
            merged.pages.insert(name.clone(), page.clone());
        }
        for (uri, page) in &other.routes {
            merged.routes.insert(uri.clone(), page.clone());
        }
        merged
    }

    /// Convert back to the on-disk document shape
    #[must_use]
    pub fn to_yaml_value(&self) -> Value {
        let mut doc = Mapping::new();
        doc.insert(key("schema_version"), Value::String(self.schema_version.clone()));
        if !self.models.is_empty() {
            let models = self
                .models
                .iter()
                .map(|(name, model)| (key(name), model.to_yaml_value()))
                .collect();
            doc.insert(key("models"), Value::Mapping(models));
        }
        if !self.actions.is_empty() {
            let actions = self
                .actions
                .iter()
                .map(|(name, action)| (key(name), action.to_yaml_value()))
                .collect();
            doc.insert(key("actions"), Value::Mapping(actions));
        }
        if !self.pages.is_empty() {
            let pages = self
                .pages
                .iter()
                .map(|(name, page)| (key(name), page.to_yaml_value()))
                .collect();
            doc.insert(key("pages"), Value::Mapping(pages));
        }
        if !self.routes.is_empty() {
            doc.insert(key("routes"), string_map(&self.routes));
        }
        Value::Mapping(doc)
    }

    /// Render as a YAML document
    ///
    /// # Errors
    /// Returns error if YAML emission fails
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_yaml_value())
    }
}

/// One model: columns plus generation hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDefinition {
    /// Model name as written in the draft
    pub name: String,
    /// Column name → type specification
    pub columns: IndexMap<String, String>,
    /// Relation kind (`hasMany`, `belongsTo`, ...) → target specifications
    pub relationships: IndexMap<String, Vec<String>>,
    /// Seeder configuration
    pub seeder: Option<SeederConfig>,
    /// Soft-delete flag
    pub soft_deletes: bool,
    /// Whether `created_at`/`updated_at` are maintained
    pub timestamps: bool,
    /// Extra traits mixed into the generated model
    pub traits: Vec<String>,
}

impl ModelDefinition {
    /// Create model with no columns
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            relationships: IndexMap::new(),
            seeder: None,
            soft_deletes: false,
            timestamps: true,
            traits: Vec::new(),
        }
    }

    /// Add a column (builder style, used by fixtures and the drafting fallback)
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.columns.insert(name.into(), spec.into());
        self
    }

    fn to_yaml_value(&self) -> Value {
        let mut map: Mapping = self
            .columns
            .iter()
            .map(|(name, spec)| (key(name), Value::String(spec.clone())))
            .collect();
        if !self.relationships.is_empty() {
            let relations = self
                .relationships
                .iter()
                .map(|(kind, targets)| (key(kind), Value::String(targets.join(", "))))
                .collect();
            map.insert(key("relationships"), Value::Mapping(relations));
        }
        if let Some(seeder) = &self.seeder {
            map.insert(key("seeder"), Value::Number(seeder.count.into()));
        }
        if self.soft_deletes {
            map.insert(key("softDeletes"), Value::Bool(true));
        }
        if !self.timestamps {
            map.insert(key("timestamps"), Value::Bool(false));
        }
        if !self.traits.is_empty() {
            map.insert(
                key("traits"),
                Value::Sequence(self.traits.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Mapping(map)
    }
}

/// Seeder generation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeederConfig {
    /// Number of rows the seeder creates
    pub count: u64,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self { count: 10 }
    }
}

/// One action entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    /// Action name as written in the draft
    pub name: String,
    /// Target model
    pub model: Option<String>,
    /// Ordered parameters
    pub params: Vec<ActionParam>,
    /// Declared return type
    pub returns: Option<String>,
}

impl ActionDefinition {
    fn to_yaml_value(&self) -> Value {
        let mut map = Mapping::new();
        if let Some(model) = &self.model {
            map.insert(key("model"), Value::String(model.clone()));
        }
        if !self.params.is_empty() {
            let params = self
                .params
                .iter()
                .map(|p| (key(&p.name), Value::String(p.param_type.clone())))
                .collect();
            map.insert(key("params"), Value::Mapping(params));
        }
        if let Some(returns) = &self.returns {
            map.insert(key("returns"), Value::String(returns.clone()));
        }
        Value::Mapping(map)
    }
}

/// Action parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionParam {
    /// Parameter name
    pub name: String,
    /// Parameter type specification
    pub param_type: String,
}

/// One page entry (may be empty)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDefinition {
    /// Page name as written in the draft
    pub name: String,
    /// Frontend component override
    pub component: Option<String>,
    /// Layout wrapper
    pub layout: Option<String>,
    /// Prop name → type
    pub props: IndexMap<String, String>,
}

impl PageDefinition {
    fn to_yaml_value(&self) -> Value {
        if self.component.is_none() && self.layout.is_none() && self.props.is_empty() {
            return Value::Null;
        }
        let mut map = Mapping::new();
        if let Some(component) = &self.component {
            map.insert(key("component"), Value::String(component.clone()));
        }
        if let Some(layout) = &self.layout {
            map.insert(key("layout"), Value::String(layout.clone()));
        }
        if !self.props.is_empty() {
            map.insert(key("props"), string_map(&self.props));
        }
        Value::Mapping(map)
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn string_map(map: &IndexMap<String, String>) -> Value {
    Value::Mapping(
        map.iter()
            .map(|(k, v)| (key(k), Value::String(v.clone())))
            .collect(),
    )
}
