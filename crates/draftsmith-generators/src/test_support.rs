//! Shared unit-test helpers

use crate::context::{GenerationContext, TableIndex};
use crate::conventions::Conventions;
use crate::stubs::Stubs;
use draftsmith_draft::{Draft, DraftParser};
use std::path::{Path, PathBuf};

pub(crate) fn draft(yaml: &str) -> Draft {
    DraftParser::new()
        .parse_str(yaml, Path::new("draft.yaml"))
        .unwrap()
}

pub(crate) struct Fixture {
    pub(crate) conventions: Conventions,
    pub(crate) stubs: Stubs,
    pub(crate) tables: TableIndex,
    pub(crate) root: PathBuf,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            conventions: Conventions::default(),
            stubs: Stubs::builtin(),
            tables: TableIndex::new(),
            root: PathBuf::from("/project"),
        }
    }
}

pub(crate) fn context<'a>(draft: &'a Draft, fx: &'a Fixture) -> GenerationContext<'a> {
    GenerationContext {
        draft,
        draft_path: Path::new("/project/draft.yaml"),
        output_root: &fx.root,
        conventions: &fx.conventions,
        stubs: &fx.stubs,
        tables: &fx.tables,
    }
}
