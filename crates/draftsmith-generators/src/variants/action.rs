//! Single-purpose action classes

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, render_stub, Generator};
use crate::naming::{camel_case, pascal_case};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ActionDefinition, Draft};

/// One class per draft action
#[derive(Debug, Clone, Copy)]
pub struct ActionGenerator {
    ownership: Ownership,
}

impl ActionGenerator {
    /// Registry name
    pub const NAME: &'static str = "action";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::ScaffoldOnly;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }

    fn render(
        &self,
        ctx: &GenerationContext<'_>,
        action: &ActionDefinition,
    ) -> Result<Candidate, GenerationError> {
        let class = pascal_case(&action.name);
        let models_ns = ctx.conventions.sub_namespace("Models");
        let mut imports: Vec<String> = Vec::new();
        let mut import_model = |ty: &str| {
            if ctx.draft.model(ty).is_some() {
                let line = format!("use {models_ns}\\{ty};");
                if !imports.contains(&line) {
                    imports.push(line);
                }
            }
        };

        if let Some(model) = &action.model {
            import_model(model);
        }
        let mut params = Vec::with_capacity(action.params.len());
        for param in &action.params {
            if param.name.is_empty() {
                return Err(GenerationError::render(
                    Self::NAME,
                    &action.name,
                    "parameter with an empty name",
                ));
            }
            import_model(&param.param_type);
            params.push(format!(
                "{} ${}",
                php_type(&param.param_type),
                camel_case(&param.name)
            ));
        }
        let returns = match &action.returns {
            Some(ty) => {
                import_model(ty);
                format!(": {}", php_type(ty))
            }
            None => String::new(),
        };
        let description = match &action.model {
            Some(model) => format!("{class} on {model}"),
            None => class.clone(),
        };

        let imports = if imports.is_empty() {
            String::new()
        } else {
            format!("\n{}", block(imports, 0))
        };
        let content = render_stub(
            ctx,
            Self::NAME,
            &action.name,
            Self::NAME,
            &[
                ("namespace", &ctx.conventions.sub_namespace("Actions")),
                ("imports", &imports),
                ("class", &class),
                ("params", &params.join(", ")),
                ("returns", &returns),
                ("description", &description),
            ],
        )?;
        let path = ctx.resolve(ctx.conventions.actions_dir.join(format!("{class}.php")));
        Ok(Candidate::new(Self::NAME, path, content, self.ownership))
    }
}

impl Default for ActionGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for ActionGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn supports(&self, draft: &Draft) -> bool {
        !draft.actions.is_empty()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<Candidate>, GenerationError> {
        ctx.draft
            .actions
            .values()
            .map(|action| self.render(ctx, action))
            .collect()
    }
}

fn php_type(ty: &str) -> String {
    match ty {
        "string" | "text" => "string".to_string(),
        "int" | "integer" | "id" => "int".to_string(),
        "bool" | "boolean" => "bool".to_string(),
        "float" | "decimal" | "double" => "float".to_string(),
        "array" | "json" => "array".to_string(),
        "void" => "void".to_string(),
        "mixed" => "mixed".to_string(),
        "date" | "datetime" | "timestamp" => "\\DateTimeInterface".to_string(),
        other => pascal_case(other),
    }
}
