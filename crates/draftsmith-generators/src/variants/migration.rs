//! Schema migrations
//!
//! File names are a pure function of the table name so reruns produce the same
//! path. A table already recorded in the ledger keeps its recorded path.

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, parse_columns, render_stub, Generator};
use crate::naming::table_name;
use draftsmith_artifact::Ownership;
use draftsmith_draft::{ColumnSpec, Draft, ModelDefinition, Modifier};

/// One `create_<table>_table` migration per draft model
#[derive(Debug, Clone, Copy)]
pub struct MigrationGenerator {
    ownership: Ownership,
}

impl MigrationGenerator {
    /// Registry name
    pub const NAME: &'static str = "migration";
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
        let table = table_name(&model.name);

        let mut lines: Vec<String> = columns.iter().map(column_statement).collect();
        if model.soft_deletes {
            lines.push("$table->softDeletes();".to_string());
        }
        if model.timestamps {
            lines.push("$table->timestamps();".to_string());
        }

        let content = render_stub(
            ctx,
            Self::NAME,
            &model.name,
            Self::NAME,
            &[("table", &table), ("columns", &block(lines, 12))],
        )?;

        let path = match ctx.tables.path_for(&table) {
            Some(recorded) => recorded.to_path_buf(),
            None => ctx.resolve(
                ctx.conventions
                    .migrations_dir
                    .join(format!("create_{table}_table.php")),
            ),
        };
        Ok(Candidate::new(Self::NAME, path, content, self.ownership).with_table(table))
    }
}

impl Default for MigrationGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for MigrationGenerator {
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

fn column_statement(column: &ColumnSpec) -> String {
    let mut statement = if column.data_type == "id" {
        format!("$table->foreignId('{}')", column.name)
    } else {
        let args: String = column.args.iter().map(|a| format!(", {}", literal(a))).collect();
        format!("$table->{}('{}'{args})", column.data_type, column.name)
    };

    for modifier in &column.modifiers {
        match modifier {
            Modifier::Nullable => statement.push_str("->nullable()"),
            Modifier::Unique => statement.push_str("->unique()"),
            Modifier::Index => statement.push_str("->index()"),
            Modifier::Unsigned => statement.push_str("->unsigned()"),
            Modifier::Default(value) => {
                statement.push_str(&format!("->default({})", literal(value)));
            }
            Modifier::Comment(text) => statement.push_str(&format!("->comment('{text}')")),
            Modifier::Foreign(table) => {
                let table = table
                    .clone()
                    .or_else(|| column.referenced_model().map(table_name));
                match table {
                    Some(table) => statement.push_str(&format!("->constrained('{table}')")),
                    None => statement.push_str("->constrained()"),
                }
            }
        }
    }
    statement.push(';');
    statement
}

fn literal(value: &str) -> String {
    let numeric = !value.is_empty() && value.parse::<f64>().is_ok();
    if numeric || matches!(value, "true" | "false" | "null") {
        value.to_string()
    } else {
        format!("'{value}'")
    }
}
