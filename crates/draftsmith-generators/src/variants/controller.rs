//! Web and API resource controllers

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{render_stub, Generator};
use crate::naming::{camel_case, kebab_case, pascal_case, plural};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{Draft, ModelDefinition};
use std::path::Path;

fn render_controller(
    ctx: &GenerationContext<'_>,
    generator: &'static str,
    model: &ModelDefinition,
    namespace: &str,
    dir: &Path,
    ownership: Ownership,
) -> Result<Candidate, GenerationError> {
    let model_class = pascal_case(&model.name);
    let class = format!("{model_class}Controller");
    let request = format!("{model_class}Request");
    let content = render_stub(
        ctx,
        generator,
        &model.name,
        generator,
        &[
            ("namespace", namespace),
            ("model_namespace", &ctx.conventions.sub_namespace("Models")),
            ("request_namespace", &ctx.conventions.sub_namespace("Http\\Requests")),
            ("model", &model_class),
            ("request", &request),
            ("class", &class),
            ("variable", &camel_case(&model.name)),
            ("plural_variable", &camel_case(&plural(&model.name))),
            ("route_name", &kebab_case(&plural(&model.name))),
        ],
    )?;
    let path = ctx.resolve(dir.join(format!("{class}.php")));
    Ok(Candidate::new(generator, path, content, ownership))
}

/// One Inertia resource controller per draft model
#[derive(Debug, Clone, Copy)]
pub struct ControllerGenerator {
    ownership: Ownership,
}

impl ControllerGenerator {
    /// Registry name
    pub const NAME: &'static str = "controller";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::ScaffoldOnly;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for ControllerGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for ControllerGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn supports(&self, draft: &Draft) -> bool {
        !draft.models.is_empty()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<Candidate>, GenerationError> {
        let namespace = ctx.conventions.sub_namespace("Http\\Controllers");
        ctx.draft
            .models
            .values()
            .map(|model| {
                render_controller(
                    ctx,
                    Self::NAME,
                    model,
                    &namespace,
                    &ctx.conventions.controllers_dir,
                    self.ownership,
                )
            })
            .collect()
    }
}

/// One JSON API controller per draft model
#[derive(Debug, Clone, Copy)]
pub struct ApiControllerGenerator {
    ownership: Ownership,
}

impl ApiControllerGenerator {
    /// Registry name
    pub const NAME: &'static str = "api-controller";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::ScaffoldOnly;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for ApiControllerGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for ApiControllerGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn supports(&self, draft: &Draft) -> bool {
        !draft.models.is_empty()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<Candidate>, GenerationError> {
        let namespace = ctx.conventions.sub_namespace("Http\\Controllers\\Api");
        ctx.draft
            .models
            .values()
            .map(|model| {
                render_controller(
                    ctx,
                    Self::NAME,
                    model,
                    &namespace,
                    &ctx.conventions.api_controllers_dir,
                    self.ownership,
                )
            })
            .collect()
    }
}
