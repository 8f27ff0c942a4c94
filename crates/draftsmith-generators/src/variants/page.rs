//! Frontend page components

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{block, render_stub, Generator};
use crate::naming::pascal_case;
use draftsmith_artifact::Ownership;
use draftsmith_draft::{Draft, PageDefinition};

const DEFAULT_LAYOUT: &str = "AppLayout";

/// Component name of a page: explicit override or `PascalCase` page name
pub(crate) fn component_name(page: &PageDefinition) -> String {
    page.component
        .clone()
        .unwrap_or_else(|| pascal_case(&page.name))
}

/// TypeScript type for a prop type
pub(crate) fn ts_type(draft: &Draft, ty: &str) -> String {
    if let Some(inner) = ty.strip_suffix("[]") {
        return format!("{}[]", ts_type(draft, inner));
    }
    match ty {
        "string" | "text" | "date" | "datetime" | "timestamp" | "uuid" => "string".to_string(),
        "int" | "integer" | "float" | "decimal" | "number" | "id" => "number".to_string(),
        "bool" | "boolean" => "boolean".to_string(),
        "array" | "json" => "unknown[]".to_string(),
        other if draft.model(other).is_some() => pascal_case(other),
        _ => "unknown".to_string(),
    }
}

/// One component per draft page
#[derive(Debug, Clone, Copy)]
pub struct PageGenerator {
    ownership: Ownership,
}

impl PageGenerator {
    /// Registry name
    pub const NAME: &'static str = "page";
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
        page: &PageDefinition,
    ) -> Result<Candidate, GenerationError> {
        let component = component_name(page);
        if component.contains(['/', '\\', '.']) {
            return Err(GenerationError::render(
                Self::NAME,
                &page.name,
                format!("component '{component}' is not a plain name"),
            ));
        }
        let layout = page.layout.as_deref().map_or(DEFAULT_LAYOUT.to_string(), pascal_case);

        let mut imports = vec![format!("import {layout} from '@/Layouts/{layout}';")];
        let mut models: Vec<String> = page
            .props
            .values()
            .map(|ty| ty.trim_end_matches("[]"))
            .filter(|ty| ctx.draft.model(ty).is_some())
            .map(pascal_case)
            .collect();
        models.sort();
        models.dedup();
        if !models.is_empty() {
            imports.push(format!("import type {{ {} }} from '@/types';", models.join(", ")));
        }
        let props = block(
            page.props
                .iter()
                .map(|(name, ty)| format!("{name}: {};", ts_type(ctx.draft, ty))),
            4,
        );

        let content = render_stub(
            ctx,
            Self::NAME,
            &page.name,
            Self::NAME,
            &[
                ("imports", &block(imports, 0)),
                ("component", &component),
                ("layout", &layout),
                ("props", &props),
                ("title", &page.name),
            ],
        )?;
        let path = ctx.resolve(
            ctx.conventions
                .pages_dir
                .join(format!("{component}.{}", ctx.conventions.page_extension)),
        );
        Ok(Candidate::new(Self::NAME, path, content, self.ownership))
    }
}

impl Default for PageGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for PageGenerator {
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
        ctx.draft
            .pages
            .values()
            .map(|page| self.render(ctx, page))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, draft, Fixture};

    #[test]
    fn empty_page_renders_default_layout() {
        let d = draft("pages:\n  Dashboard:\n");
        let fx = Fixture::new();
        let out = PageGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        assert!(out[0].path.ends_with("resources/js/Pages/Dashboard.tsx"));
        assert!(out[0].content.contains("import AppLayout from '@/Layouts/AppLayout';"));
        assert!(out[0].content.contains("export default function Dashboard"));
    }

    #[test]
    fn props_and_component_override() {
        let d = draft(
            r"
models:
  Post:
    title: string
pages:
  post_index:
    component: PostList
    layout: guest_layout
    props:
      posts: Post[]
      total: integer
",
        );
        let fx = Fixture::new();
        let out = PageGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap();
        let content = &out[0].content;
        assert!(out[0].path.ends_with("resources/js/Pages/PostList.tsx"));
        assert!(content.contains("import GuestLayout from '@/Layouts/GuestLayout';"));
        assert!(content.contains("import type { Post } from '@/types';"));
        assert!(content.contains("    posts: Post[];"));
        assert!(content.contains("    total: number;"));
    }

    #[test]
    fn component_with_path_separator_fails() {
        let d = draft("pages:\n  Admin:\n    component: admin/Index\n");
        let fx = Fixture::new();
        let err = PageGenerator::default()
            .generate(&context(&d, &fx))
            .unwrap_err();
        assert_eq!(err.entity(), "Admin");
    }
}
