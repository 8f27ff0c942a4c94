//! Eloquent model classes

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, parse_columns, render_stub, Generator};
use crate::naming::{camel_case, pascal_case, plural, table_name};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ColumnSpec, Draft, ModelDefinition};

const RELATION_KINDS: &[&str] = &[
    "hasOne",
    "hasMany",
    "belongsTo",
    "belongsToMany",
    "morphTo",
    "morphOne",
    "morphMany",
];

/// One model class per draft model
#[derive(Debug, Clone, Copy)]
pub struct ModelGenerator {
    ownership: Ownership,
}

impl ModelGenerator {
    /// Registry name
    pub const NAME: &'static str = "model";
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
        let class = pascal_case(&model.name);
        let table = table_name(&model.name);

        let mut traits = vec!["HasFactory".to_string()];
        let mut imports = Vec::new();
        if model.soft_deletes {
            traits.push("SoftDeletes".to_string());
            imports.push("use Illuminate\\Database\\Eloquent\\SoftDeletes;".to_string());
        }
        traits.extend(model.traits.iter().cloned());

        let mut methods = String::new();
        for (kind, targets) in &model.relationships {
            if !RELATION_KINDS.contains(&kind.as_str()) {
                return Err(GenerationError::render(
                    Self::NAME,
                    &model.name,
                    format!("unknown relationship kind '{kind}'"),
                ));
            }
            let relation_class = pascal_case(kind);
            let import = format!("use Illuminate\\Database\\Eloquent\\Relations\\{relation_class};");
            if !imports.contains(&import) {
                imports.push(import);
            }
            for target in targets {
                methods.push_str(&relationship_method(kind, &relation_class, target));
            }
        }

        let fillable = block(columns.iter().map(|c| format!("'{}',", c.name)), 8);
        let casts = block(
            columns
                .iter()
                .filter_map(|c| cast_for(c).map(|cast| format!("'{}' => '{cast}',", c.name))),
            8,
        );
        let imports = block(imports, 0);
        let timestamps = if model.timestamps {
            String::new()
        } else {
            "\n    public $timestamps = false;\n".to_string()
        };

        let content = render_stub(
            ctx,
            Self::NAME,
            &model.name,
            Self::NAME,
            &[
                ("namespace", &ctx.conventions.sub_namespace("Models")),
                ("imports", &imports),
                ("class", &class),
                ("traits", &traits.join(", ")),
                ("table", &table),
                ("timestamps", &timestamps),
                ("fillable", &fillable),
                ("casts", &casts),
                ("relationships", &methods),
            ],
        )?;
        let path = ctx.resolve(ctx.conventions.models_dir.join(format!("{class}.php")));
        Ok(Candidate::new(Self::NAME, path, content, self.ownership))
    }
}

impl Default for ModelGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for ModelGenerator {
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

fn relationship_method(kind: &str, relation_class: &str, target: &str) -> String {
    let (model, alias) = match target.split_once(':') {
        Some((model, alias)) => (model.trim(), Some(alias.trim())),
        None => (target.trim(), None),
    };
    if kind == "morphTo" {
        let method = camel_case(model);
        return format!(
            "\n    public function {method}(): {relation_class}\n    {{\n        return $this->morphTo();\n    }}\n"
        );
    }

    let class = pascal_case(model);
    let many = matches!(kind, "hasMany" | "belongsToMany" | "morphMany");
    let method = match (alias, many) {
        (Some(alias), _) if !kind.starts_with("morph") => camel_case(alias),
        (_, true) => camel_case(&plural(model)),
        (_, false) => camel_case(model),
    };
    let args = match (kind.starts_with("morph"), alias) {
        (true, Some(morph_name)) => format!("{class}::class, '{morph_name}'"),
        _ => format!("{class}::class"),
    };
    format!(
        "\n    public function {method}(): {relation_class}\n    {{\n        return $this->{kind}({args});\n    }}\n"
    )
}

fn cast_for(column: &ColumnSpec) -> Option<String> {
    match column.data_type.as_str() {
        "boolean" => Some("boolean".to_string()),
        "date" => Some("date".to_string()),
        "datetime" | "timestamp" | "dateTime" => Some("datetime".to_string()),
        "json" | "jsonb" => Some("array".to_string()),
        "decimal" => Some(format!(
            "decimal:{}",
            column.args.get(1).map_or("2", String::as_str)
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, draft, Fixture};

    #[test]
    fn one_candidate_per_model_in_order() {
        let d = draft("models:\n  Post:\n    title: string\n  Comment:\n    body: text\n");
        let fx = Fixture::new();
        let out = ModelGenerator::default().generate(&context(&d, &fx)).unwrap();
        let names: Vec<_> = out
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Post.php", "Comment.php"]);
        assert!(out.iter().all(|c| c.ownership == Ownership::Regenerate));
        assert!(out[0].path.starts_with("/project/app/Models"));
    }

    #[test]
    fn renders_fillable_casts_and_relations() {
        let d = draft(
            r"
models:
  User:
    name: string
  Post:
    title: string:255
    published_at: timestamp nullable
    user_id: id:User foreign
    softDeletes: true
    relationships:
      belongsTo: User
      hasMany: Comment
  Comment:
    body: text
",
        );
        let fx = Fixture::new();
        let out = ModelGenerator::default().generate(&context(&d, &fx)).unwrap();
        let post = &out[1].content;
        assert!(post.contains("class Post extends Model"));
        assert!(post.contains("use HasFactory, SoftDeletes;"));
        assert!(post.contains("'title',"));
        assert!(post.contains("'published_at' => 'datetime',"));
        assert!(post.contains("public function user(): BelongsTo"));
        assert!(post.contains("public function comments(): HasMany"));
        assert!(post.contains("protected $table = 'posts';"));
    }

    #[test]
    fn bad_column_names_model() {
        let d = draft("models:\n  Post:\n    title: string shiny\n");
        let fx = Fixture::new();
        let err = ModelGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap_err();
        assert_eq!(err.entity(), "Post");
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn unknown_relationship_kind_fails() {
        let d = draft("models:\n  Post:\n    title: string\n    relationships:\n      owns: User\n");
        let fx = Fixture::new();
        let err = ModelGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Render { .. }));
    }

    #[test]
    fn deterministic() {
        let d = draft("models:\n  Post:\n    title: string\n");
        let fx = Fixture::new();
        let a = ModelGenerator::default().generate(&context(&d, &fx)).unwrap();
        let b = ModelGenerator::default().generate(&context(&d, &fx)).unwrap();
        assert_eq!(a, b);
    }
}
