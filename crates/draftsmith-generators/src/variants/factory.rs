//! Model factories and database seeders

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, parse_columns, render_stub, Generator};
use crate::naming::pascal_case;
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ColumnSpec, Draft, ModelDefinition};

/// One factory per draft model
#[derive(Debug, Clone, Copy)]
pub struct FactoryGenerator {
    ownership: Ownership,
}

impl FactoryGenerator {
    /// Registry name
    pub const NAME: &'static str = "factory";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::Regenerate;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }

    fn render(
        &self,
        ctx: &GenerationContext<'_>,
        model: &ModelDefinition,
    ) -> Result<Candidate, GenerationError> {
        let columns = parse_columns(Self::NAME, model)?;
        let model_class = pascal_case(&model.name);
        let class = format!("{model_class}Factory");
        let model_namespace = ctx.conventions.sub_namespace("Models");
        let fields = block(
            columns
                .iter()
                .map(|c| format!("'{}' => {},", c.name, fake_value(c, &model_namespace))),
            12,
        );

        let content = render_stub(
            ctx,
            Self::NAME,
            &model.name,
            Self::NAME,
            &[
                ("model_namespace", &model_namespace),
                ("model", &model_class),
                ("class", &class),
                ("fields", &fields),
            ],
        )?;
        let path = ctx.resolve(ctx.conventions.factories_dir.join(format!("{class}.php")));
        Ok(Candidate::new(Self::NAME, path, content, self.ownership))
    }
}

impl Default for FactoryGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for FactoryGenerator {
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
        ctx.draft
            .models
            .values()
            .map(|model| self.render(ctx, model))
            .collect()
    }
}

fn fake_value(column: &ColumnSpec, model_namespace: &str) -> String {
    if let Some(model) = column.referenced_model() {
        return format!("\\{model_namespace}\\{}::factory()", pascal_case(model));
    }
    let name = column.name.as_str();
    let value = match column.data_type.as_str() {
        _ if name == "email" || name.ends_with("_email") => "fake()->safeEmail()",
        _ if name == "name" || name.ends_with("_name") => "fake()->name()",
        _ if name.ends_with("url") => "fake()->url()",
        "string" | "char" => "fake()->sentence(4)",
        "text" | "mediumText" | "longtext" | "longText" | "mediumtext" => "fake()->paragraphs(3, true)",
        "integer" | "bigInteger" | "smallInteger" | "tinyInteger" | "unsignedInteger" => {
            "fake()->numberBetween(1, 1000)"
        }
        "decimal" | "float" | "double" => "fake()->randomFloat(2, 0, 1000)",
        "boolean" => "fake()->boolean()",
        "date" => "fake()->date()",
        "datetime" | "dateTime" | "timestamp" => "fake()->dateTime()",
        "uuid" => "fake()->uuid()",
        "json" | "jsonb" => "[]",
        "enum" => {
            return column.args.first().map_or_else(
                || "null".to_string(),
                |first| format!("'{first}'"),
            )
        }
        _ => "fake()->word()",
    };
    value.to_string()
}

/// One seeder per draft model
#[derive(Debug, Clone, Copy)]
pub struct SeederGenerator {
    ownership: Ownership,
}

impl SeederGenerator {
    /// Registry name
    pub const NAME: &'static str = "seeder";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::ScaffoldOnly;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for SeederGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for SeederGenerator {
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
        ctx.draft
            .models
            .values()
            .map(|model| {
                let model_class = pascal_case(&model.name);
                let class = format!("{model_class}Seeder");
                let count = model.seeder.unwrap_or_default().count.to_string();
                let content = render_stub(
                    ctx,
                    Self::NAME,
                    &model.name,
                    Self::NAME,
                    &[
                        ("model_namespace", &ctx.conventions.sub_namespace("Models")),
                        ("model", &model_class),
                        ("class", &class),
                        ("count", &count),
                    ],
                )?;
                let path = ctx.resolve(ctx.conventions.seeders_dir.join(format!("{class}.php")));
                Ok(Candidate::new(Self::NAME, path, content, self.ownership))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, draft, Fixture};

    #[test]
    fn factory_fields_follow_types() {
        let d = draft(
            "models:\n  Post:\n    title: string\n    author_email: string\n    views: integer\n    user_id: id:User\n",
        );
        let fx = Fixture::new();
        let out = FactoryGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        let content = &out[0].content;
        assert!(out[0].path.ends_with("database/factories/PostFactory.php"));
        assert!(content.contains("'title' => fake()->sentence(4),"));
        assert!(content.contains("'author_email' => fake()->safeEmail(),"));
        assert!(content.contains("'views' => fake()->numberBetween(1, 1000),"));
        assert!(content.contains("'user_id' => \\App\\Models\\User::factory(),"));
    }

    #[test]
    fn seeder_uses_configured_count() {
        let d = draft("models:\n  Post:\n    title: string\n    seeder: 25\n  Tag:\n    name: string\n");
        let fx = Fixture::new();
        let out = SeederGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].content.contains("->count(25)"));
        assert!(out[1].content.contains("->count(10)"));
        assert_eq!(out[0].ownership, Ownership::ScaffoldOnly);
    }
}
