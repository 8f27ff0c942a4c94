//! Form request validation classes

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, parse_columns, render_stub, Generator};
use crate::naming::{pascal_case, table_name};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ColumnSpec, Draft, Modifier};

/// One form request per draft model
#[derive(Debug, Clone, Copy)]
pub struct RequestGenerator {
    ownership: Ownership,
}

impl RequestGenerator {
    /// Registry name
    pub const NAME: &'static str = "request";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::ScaffoldOnly;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for RequestGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for RequestGenerator {
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
                let columns = parse_columns(Self::NAME, model)?;
                let table = table_name(&model.name);
                let class = format!("{}Request", pascal_case(&model.name));
                let rules = block(
                    columns.iter().map(|c| {
                        let rules: Vec<String> =
                            rules_for(c, &table).iter().map(|r| format!("'{r}'")).collect();
                        format!("'{}' => [{}],", c.name, rules.join(", "))
                    }),
                    12,
                );
                let content = render_stub(
                    ctx,
                    Self::NAME,
                    &model.name,
                    Self::NAME,
                    &[
                        ("namespace", &ctx.conventions.sub_namespace("Http\\Requests")),
                        ("class", &class),
                        ("rules", &rules),
                    ],
                )?;
                let path = ctx.resolve(ctx.conventions.requests_dir.join(format!("{class}.php")));
                Ok(Candidate::new(Self::NAME, path, content, self.ownership))
            })
            .collect()
    }
}

fn rules_for(column: &ColumnSpec, table: &str) -> Vec<String> {
    let mut rules = vec![if column.is_nullable() {
        "nullable".to_string()
    } else {
        "required".to_string()
    }];

    match column.data_type.as_str() {
        "string" | "char" => {
            rules.push("string".to_string());
            if let Some(max) = column.args.first() {
                rules.push(format!("max:{max}"));
            }
        }
        "text" | "mediumText" | "mediumtext" | "longText" | "longtext" => {
            rules.push("string".to_string());
        }
        "integer" | "bigInteger" | "smallInteger" | "tinyInteger" | "unsignedInteger" => {
            rules.push("integer".to_string());
        }
        "decimal" | "float" | "double" => rules.push("numeric".to_string()),
        "boolean" => rules.push("boolean".to_string()),
        "date" | "datetime" | "dateTime" | "timestamp" => rules.push("date".to_string()),
        "json" | "jsonb" => rules.push("array".to_string()),
        "uuid" => rules.push("uuid".to_string()),
        "enum" => rules.push(format!("in:{}", column.args.join(","))),
        "id" => {
            rules.push("integer".to_string());
            if let Some(model) = column.referenced_model() {
                rules.push(format!("exists:{},id", table_name(model)));
            }
        }
        _ => {}
    }

    if column.name == "email" || column.name.ends_with("_email") {
        rules.push("email".to_string());
    }
    if column.has(&Modifier::Unique) {
        rules.push(format!("unique:{table},{}", column.name));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, draft, Fixture};

    #[test]
    fn rules_follow_columns() {
        let d = draft(
            r"
models:
  User:
    name: string:100
    email: string unique
  Post:
    title: string:255
    published_at: timestamp nullable
    user_id: id:User foreign
",
        );
        let fx = Fixture::new();
        let out = RequestGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        let user = &out[0].content;
        assert!(user.contains("'name' => ['required', 'string', 'max:100'],"));
        assert!(user.contains("'email' => ['required', 'string', 'email', 'unique:users,email'],"));

        let post = &out[1].content;
        assert!(out[1].path.ends_with("app/Http/Requests/PostRequest.php"));
        assert!(post.contains("'published_at' => ['nullable', 'date'],"));
        assert!(post.contains("'user_id' => ['required', 'integer', 'exists:users,id'],"));
    }
}
