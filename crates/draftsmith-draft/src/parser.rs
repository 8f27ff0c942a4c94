//! YAML draft parser
//!
//! Reads a draft document with serde_yaml and lowers the generic
//! [`Value`] tree into a [`Draft`]. Only minimal structure is enforced here;
//! column grammar and cross references are left to validation rules and
//! generators.

use crate::error::DraftError;
use crate::model::{
    ActionDefinition, ActionParam, Draft, ModelDefinition, PageDefinition, SeederConfig,
    DEFAULT_SCHEMA_VERSION,
};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Message used when models, actions and pages are all empty
pub const EMPTY_DRAFT_MESSAGE: &str =
    "draft must define at least one non-empty section among models, actions, pages";

/// Stateless draft parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftParser;

impl DraftParser {
    /// Create new parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse the draft file at `path`
    ///
    /// # Errors
    /// - [`DraftError::NotFound`] if `path` is not an existing file
    /// - [`DraftError::Invalid`] if the content is not valid YAML or has no
    ///   non-empty section
    /// - [`DraftError::Io`] if the file exists but cannot be read
    pub fn parse(&self, path: &Path) -> Result<Draft, DraftError> {
        if !path.is_file() {
            return Err(DraftError::not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                DraftError::invalid(path, "draft is not valid UTF-8")
            } else {
                DraftError::io_error(path, e)
            }
        })?;
        self.parse_str(&content, path)
    }

    /// Parse draft text; `origin` is only used in error messages
    ///
    /// # Errors
    /// Returns [`DraftError::Invalid`] for malformed or empty drafts
    pub fn parse_str(&self, content: &str, origin: &Path) -> Result<Draft, DraftError> {
        let draft = self.parse_partial(content, origin)?;
        if draft.is_empty() {
            return Err(DraftError::invalid(origin, EMPTY_DRAFT_MESSAGE));
        }
        Ok(draft)
    }

    /// Parse draft text that may have every section empty
    ///
    /// # Errors
    /// Returns [`DraftError::Invalid`] for malformed drafts
    pub fn parse_partial(&self, content: &str, origin: &Path) -> Result<Draft, DraftError> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|e| DraftError::invalid(origin, format!("YAML parse error: {e}")))?;

        let draft = match document {
            Value::Null => Draft::default(),
            Value::Mapping(map) => {
                lower_document(&map).map_err(|message| DraftError::invalid(origin, message))?
            }
            _ => {
                return Err(DraftError::invalid(
                    origin,
                    "top-level document must be a mapping",
                ))
            }
        };
        Ok(draft)
    }
}

type Lowered<T> = Result<T, String>;

fn lower_document(doc: &Mapping) -> Lowered<Draft> {
    let mut draft = Draft::default();

    if let Some(version) = doc.get("schema_version") {
        draft.schema_version = match version {
            Value::Null => DEFAULT_SCHEMA_VERSION.to_string(),
            other => scalar(other).ok_or("schema_version must be a string")?,
        };
    }

    for (name, value) in section(doc, "models")? {
        let model = lower_model(&name, value)?;
        draft.models.insert(name, model);
    }
    for (name, value) in section(doc, "actions")? {
        let action = lower_action(&name, value)?;
        draft.actions.insert(name, action);
    }
    for (name, value) in section(doc, "pages")? {
        let page = lower_page(&name, value)?;
        draft.pages.insert(name, page);
    }
    for (uri, value) in section(doc, "routes")? {
        let target = scalar(value).ok_or_else(|| format!("route '{uri}' must name a page"))?;
        draft.routes.insert(uri, target);
    }

    Ok(draft)
}

/// Entries of a top-level section, in file order
fn section<'a>(doc: &'a Mapping, name: &str) -> Lowered<Vec<(String, &'a Value)>> {
    match doc.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Mapping(map)) => map
            .iter()
            .map(|(k, v)| match k {
                Value::String(s) if !s.trim().is_empty() => Ok((s.clone(), v)),
                _ => Err(format!("{name} entries must have non-empty string names")),
            })
            .collect(),
        Some(_) => Err(format!("{name} must be a mapping")),
    }
}

fn lower_model(name: &str, value: &Value) -> Lowered<ModelDefinition> {
    let mut model = ModelDefinition::new(name);
    let map = match value {
        Value::Null => return Ok(model),
        Value::Mapping(map) => map,
        _ => return Err(format!("model '{name}' must be a mapping of columns")),
    };

    for (key, value) in map {
        let key = key
            .as_str()
            .ok_or_else(|| format!("model '{name}' has a non-string key"))?;
        match key {
            "relationships" => model.relationships = lower_relationships(name, value)?,
            "seeder" => model.seeder = lower_seeder(name, value)?,
            "softDeletes" | "soft_deletes" => {
                model.soft_deletes = flag(value, true)
                    .ok_or_else(|| format!("model '{name}': {key} must be a boolean"))?;
            }
            "timestamps" => {
                model.timestamps = flag(value, true)
                    .ok_or_else(|| format!("model '{name}': timestamps must be a boolean"))?;
            }
            "traits" => model.traits = string_list(value)
                .ok_or_else(|| format!("model '{name}': traits must be a list of names"))?,
            column => {
                let spec = scalar(value).ok_or_else(|| {
                    format!("column '{column}' on model '{name}' must be a type string")
                })?;
                model.columns.insert(column.to_string(), spec);
            }
        }
    }
    Ok(model)
}

fn lower_relationships(model: &str, value: &Value) -> Lowered<IndexMap<String, Vec<String>>> {
    let map = match value {
        Value::Null => return Ok(IndexMap::new()),
        Value::Mapping(map) => map,
        _ => return Err(format!("model '{model}': relationships must be a mapping")),
    };
    map.iter()
        .map(|(kind, targets)| {
            let kind = kind
                .as_str()
                .ok_or_else(|| format!("model '{model}': relationship kinds must be strings"))?;
            let targets = string_list(targets).ok_or_else(|| {
                format!("model '{model}': relationship '{kind}' must list target models")
            })?;
            Ok((kind.to_string(), targets))
        })
        .collect()
}

fn lower_seeder(model: &str, value: &Value) -> Lowered<Option<SeederConfig>> {
    match value {
        Value::Null | Value::Bool(true) => Ok(Some(SeederConfig::default())),
        Value::Bool(false) => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(|count| Some(SeederConfig { count }))
            .ok_or_else(|| format!("model '{model}': seeder count must be a positive integer")),
        Value::Mapping(map) => match map.get("count") {
            None => Ok(Some(SeederConfig::default())),
            Some(count) => count
                .as_u64()
                .map(|count| Some(SeederConfig { count }))
                .ok_or_else(|| format!("model '{model}': seeder count must be a positive integer")),
        },
        _ => Err(format!("model '{model}': seeder must be a count or a mapping")),
    }
}

fn lower_action(name: &str, value: &Value) -> Lowered<ActionDefinition> {
    let mut action = ActionDefinition {
        name: name.to_string(),
        model: None,
        params: Vec::new(),
        returns: None,
    };
    let map = match value {
        Value::Null => return Ok(action),
        Value::Mapping(map) => map,
        _ => return Err(format!("action '{name}' must be a mapping")),
    };

    if let Some(model) = map.get("model") {
        action.model =
            Some(scalar(model).ok_or_else(|| format!("action '{name}': model must be a name"))?);
    }
    if let Some(params) = map.get("params") {
        action.params = lower_params(name, params)?;
    }
    if let Some(returns) = map.get("returns").or_else(|| map.get("return")) {
        action.returns = Some(
            scalar(returns).ok_or_else(|| format!("action '{name}': returns must be a type"))?,
        );
    }
    Ok(action)
}

fn lower_params(action: &str, value: &Value) -> Lowered<Vec<ActionParam>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                let raw = scalar(item)
                    .ok_or_else(|| format!("action '{action}': params must be strings"))?;
                let (name, param_type) = raw.split_once(':').unwrap_or((raw.as_str(), "mixed"));
                Ok(ActionParam {
                    name: name.trim().to_string(),
                    param_type: param_type.trim().to_string(),
                })
            })
            .collect(),
        Value::Mapping(map) => map
            .iter()
            .map(|(k, v)| {
                let name = scalar(k)
                    .ok_or_else(|| format!("action '{action}': param names must be strings"))?;
                let param_type = scalar(v)
                    .ok_or_else(|| format!("action '{action}': param '{name}' needs a type"))?;
                Ok(ActionParam { name, param_type })
            })
            .collect(),
        _ => Err(format!("action '{action}': params must be a list or mapping")),
    }
}

fn lower_page(name: &str, value: &Value) -> Lowered<PageDefinition> {
    let mut page = PageDefinition {
        name: name.to_string(),
        ..PageDefinition::default()
    };
    let map = match value {
        Value::Null => return Ok(page),
        Value::Mapping(map) => map,
        _ => return Err(format!("page '{name}' must be a mapping or empty")),
    };

    if let Some(component) = map.get("component") {
        page.component = Some(
            scalar(component).ok_or_else(|| format!("page '{name}': component must be a name"))?,
        );
    }
    if let Some(layout) = map.get("layout") {
        page.layout =
            Some(scalar(layout).ok_or_else(|| format!("page '{name}': layout must be a name"))?);
    }
    match map.get("props") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(props)) => {
            for (prop, ty) in props {
                let prop =
                    scalar(prop).ok_or_else(|| format!("page '{name}': prop names must be strings"))?;
                let ty = scalar(ty)
                    .ok_or_else(|| format!("page '{name}': prop '{prop}' needs a type"))?;
                page.props.insert(prop, ty);
            }
        }
        Some(_) => return Err(format!("page '{name}': props must be a mapping")),
    }
    Ok(page)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `null` means "present", e.g. a bare `softDeletes:` key
fn flag(value: &Value, null_means: bool) -> Option<bool> {
    match value {
        Value::Null => Some(null_means),
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// A sequence of scalars, or one comma-separated string
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Sequence(items) => items.iter().map(scalar).collect(),
        _ => None,
    }
}
