//! Web routes file

use crate::candidate::Candidate;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::{render_stub, Generator};
use crate::naming::kebab_case;
use crate::variants::page::component_name;
use draftsmith_artifact::Ownership;
use draftsmith_draft::Draft;
use std::collections::BTreeMap;

/// A single routes file with one route per draft page
///
/// The URI defaults to the kebab-cased page name; the draft's `routes`
/// section overrides it.
#[derive(Debug, Clone, Copy)]
pub struct RouteGenerator {
    ownership: Ownership,
}

impl RouteGenerator {
    /// Registry name
    pub const NAME: &'static str = "route";
    /// Ownership when not overridden
    pub const DEFAULT_OWNERSHIP: Ownership = Ownership::Regenerate;

    /// Create generator stamping `ownership`
    #[inline]
    #[must_use]
    pub fn new(ownership: Ownership) -> Self {
        Self { ownership }
    }
}

impl Default for RouteGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OWNERSHIP)
    }
}

impl Generator for RouteGenerator {
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
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        let mut routes = String::new();
        for page in ctx.draft.pages.values() {
            let uri = ctx
                .draft
                .route_for_page(&page.name)
                .map_or_else(|| format!("/{}", kebab_case(&page.name)), str::to_string);
            if let Some(previous) = seen.insert(uri.clone(), &page.name) {
                return Err(GenerationError::render(
                    Self::NAME,
                    &page.name,
                    format!("route '{uri}' is already used by page '{previous}'"),
                ));
            }
            routes.push_str(&format!(
                "Route::get('{uri}', fn () => Inertia::render('{}'))->name('{}');\n",
                component_name(page),
                kebab_case(&page.name)
            ));
        }

        let content = render_stub(ctx, Self::NAME, "routes", Self::NAME, &[("routes", &routes)])?;
        let path = ctx.resolve(&ctx.conventions.routes_file);
        Ok(vec![Candidate::new(Self::NAME, path, content, self.ownership)])
    }
}
