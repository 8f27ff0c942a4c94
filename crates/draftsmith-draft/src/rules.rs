//! Draft validation rules
//!
//! Rules inspect a parsed [`Draft`] and report every problem they find. The
//! built-in set covers column grammar and cross references; callers register
//! extra rules alongside them.

use crate::column::ColumnSpec;
use crate::model::Draft;
use std::fmt;

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftIssue {
    /// Rule that reported the problem
    pub rule: String,
    /// Location in the draft, e.g. `models.Post.title`
    pub location: String,
    /// Human-readable description
    pub message: String,
}

impl DraftIssue {
    /// Create new issue
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DraftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A check run by `validate`
pub trait ValidationRule: Send + Sync {
    /// Stable rule identifier
    fn name(&self) -> &'static str;

    /// All problems found in `draft`
    fn check(&self, draft: &Draft) -> Vec<DraftIssue>;
}

/// Every column spec parses
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnSpecRule;

impl ValidationRule for ColumnSpecRule {
    fn name(&self) -> &'static str {
        "column_spec"
    }

    fn check(&self, draft: &Draft) -> Vec<DraftIssue> {
        draft
            .models
            .iter()
            .flat_map(|(model, def)| {
                def.columns.iter().filter_map(move |(column, spec)| {
                    ColumnSpec::parse(column, spec).err().map(|e| {
                        DraftIssue::new(self.name(), format!("models.{model}.{column}"), e.to_string())
                    })
                })
            })
            .collect()
    }
}

/// Relationship targets and `id:Model` columns name known models
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelReferenceRule;

impl ValidationRule for ModelReferenceRule {
    fn name(&self) -> &'static str {
        "model_reference"
    }

    fn check(&self, draft: &Draft) -> Vec<DraftIssue> {
        let mut issues = Vec::new();
        for (model, def) in &draft.models {
            for (kind, targets) in &def.relationships {
                // morphTo and friends point at a type column, not a model
                if kind.starts_with("morph") {
                    continue;
                }
                for target in targets {
                    let target_model = target.split(':').next().unwrap_or(target).trim();
                    if draft.model(target_model).is_none() {
                        issues.push(DraftIssue::new(
                            self.name(),
                            format!("models.{model}.relationships.{kind}"),
                            format!("unknown model '{target_model}'"),
                        ));
                    }
                }
            }
            for (column, spec) in &def.columns {
                let Ok(parsed) = ColumnSpec::parse(column, spec) else {
                    continue;
                };
                if let Some(referenced) = parsed.referenced_model() {
                    if draft.model(referenced).is_none() {
                        issues.push(DraftIssue::new(
                            self.name(),
                            format!("models.{model}.{column}"),
                            format!("unknown model '{referenced}'"),
                        ));
                    }
                }
            }
        }
        issues
    }
}

/// Action `model` keys name known models
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionModelRule;

impl ValidationRule for ActionModelRule {
    fn name(&self) -> &'static str {
        "action_model"
    }

    fn check(&self, draft: &Draft) -> Vec<DraftIssue> {
        draft
            .actions
            .iter()
            .filter_map(|(action, def)| {
                let model = def.model.as_deref()?;
                draft.model(model).is_none().then(|| {
                    DraftIssue::new(
                        self.name(),
                        format!("actions.{action}.model"),
                        format!("unknown model '{model}'"),
                    )
                })
            })
            .collect()
    }
}

/// Route overrides point at known pages
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTargetRule;

impl ValidationRule for RouteTargetRule {
    fn name(&self) -> &'static str {
        "route_target"
    }

    fn check(&self, draft: &Draft) -> Vec<DraftIssue> {
        draft
            .routes
            .iter()
            .filter(|(_, page)| draft.page(page).is_none())
            .map(|(uri, page)| {
                DraftIssue::new(
                    self.name(),
                    format!("routes.{uri}"),
                    format!("unknown page '{page}'"),
                )
            })
            .collect()
    }
}

/// The built-in rule set
#[must_use]
pub fn builtin_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(ColumnSpecRule),
        Box::new(ModelReferenceRule),
        Box::new(ActionModelRule),
        Box::new(RouteTargetRule),
    ]
}
