//! Frontend type definitions for page props

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, render_stub, Generator};
use crate::variants::page::{component_name, ts_type};
use draftsmith_artifact::Ownership;
use draftsmith_draft::Draft;

/// A single declaration file with one props interface per draft page
#[derive(Debug, Clone, Copy)]
pub struct ScriptGenerator {
    ownership: Ownership,
}

impl ScriptGenerator {
    /// Registry name
    pub const NAME: &'static str = "script";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::Regenerate;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for ScriptGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for ScriptGenerator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn supports(&self, draft: &Draft) -> bool {
        !draft.pages.is_empty()
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<Candidate>, GenerationError> {
        let interfaces: String = ctx
            .draft
            .pages
            .values()
            .map(|page| {
                let fields = block(
                    page.props
                        .iter()
                        .map(|(name, ty)| format!("{name}: {};", ts_type(ctx.draft, ty))),
                    4,
                );
                format!(
                    "export interface {}Props {{\n{fields}}}\n\n",
                    component_name(page)
                )
            })
            .collect();

        let content = render_stub(
            ctx,
            Self::NAME,
            "pages",
            Self::NAME,
            &[("interfaces", interfaces.trim_end())],
        )?;
        let path = ctx.resolve(ctx.conventions.types_dir.join("pages.d.ts"));
        Ok(vec![Candidate::new(
            Self::NAME,
            path,
            format!("{content}\n"),
            self.ownership,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, draft, Fixture};

    #[test]
    fn one_interface_per_page() {
        let d = draft("pages:\n  Dashboard:\n  Profile:\n    props:\n      name: string\n");
        let fx = Fixture::new();
        let out = ScriptGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].path.ends_with("resources/js/types/pages.d.ts"));
        let content = &out[0].content;
        assert!(content.contains("export interface DashboardProps {\n}"));
        assert!(content.contains("export interface ProfileProps {\n    name: string;\n}"));
        assert!(content.ends_with("}\n"));
    }
}
