//! Built-in generator variants

mod action;
mod controller;
mod factory;
mod migration;
mod model;
pub(crate) mod page;
mod request;
mod route;
mod script;

pub use action::ActionGenerator;
pub use controller::{ApiControllerGenerator, ControllerGenerator};
pub use factory::{FactoryGenerator, SeederGenerator};
pub use migration::MigrationGenerator;
pub use model::ModelGenerator;
pub use page::PageGenerator;
pub use request::RequestGenerator;
pub use route::RouteGenerator;
pub use script::ScriptGenerator;
pub use feature_test::TestGenerator;

use crate::generator::Generator;
use draftsmith_artifact::Ownership;

/// Names of the built-in variants in generation order
pub const BUILTIN_NAMES: &[&str] = &[
    ModelGenerator::NAME,
    MigrationGenerator::NAME,
    FactoryGenerator::NAME,
    SeederGenerator::NAME,
    ActionGenerator::NAME,
    ControllerGenerator::NAME,
    ApiControllerGenerator::NAME,
    RequestGenerator::NAME,
    RouteGenerator::NAME,
    PageGenerator::NAME,
    ScriptGenerator::NAME,
    TestGenerator::NAME,
];

/// Default ownership of a built-in variant
#[must_use]
pub fn default_ownership(name: &str) -> Option<Ownership> {
    let ownership = match name {
        ModelGenerator::NAME => ModelGenerator::DEFAULT_OWNERSHIP,
        MigrationGenerator::NAME => MigrationGenerator::DEFAULT_OWNERSHIP,
        FactoryGenerator::NAME => FactoryGenerator::DEFAULT_OWNERSHIP,
        SeederGenerator::NAME => SeederGenerator::DEFAULT_OWNERSHIP,
        ActionGenerator::NAME => ActionGenerator::DEFAULT_OWNERSHIP,
        ControllerGenerator::NAME => ControllerGenerator::DEFAULT_OWNERSHIP,
        ApiControllerGenerator::NAME => ApiControllerGenerator::DEFAULT_OWNERSHIP,
        RequestGenerator::NAME => RequestGenerator::DEFAULT_OWNERSHIP,
        RouteGenerator::NAME => RouteGenerator::DEFAULT_OWNERSHIP,
        PageGenerator::NAME => PageGenerator::DEFAULT_OWNERSHIP,
        ScriptGenerator::NAME => ScriptGenerator::DEFAULT_OWNERSHIP,
        TestGenerator::NAME => TestGenerator::DEFAULT_OWNERSHIP,
        _ => return None,
    };
    Some(ownership)
}

/// Construct built-in variant `name` stamping `ownership`
#[must_use]
pub fn builtin(name: &str, ownership: Ownership) -> Option<Box<dyn Generator>> {
    let generator: Box<dyn Generator> = match name {
        ModelGenerator::NAME => Box::new(ModelGenerator::new(ownership)),
        MigrationGenerator::NAME => Box::new(MigrationGenerator::new(ownership)),
        FactoryGenerator::NAME => Box::new(FactoryGenerator::new(ownership)),
        SeederGenerator::NAME => Box::new(SeederGenerator::new(ownership)),
        ActionGenerator::NAME => Box::new(ActionGenerator::new(ownership)),
        ControllerGenerator::NAME => Box::new(ControllerGenerator::new(ownership)),
        ApiControllerGenerator::NAME => Box::new(ApiControllerGenerator::new(ownership)),
        RequestGenerator::NAME => Box::new(RequestGenerator::new(ownership)),
        RouteGenerator::NAME => Box::new(RouteGenerator::new(ownership)),
        PageGenerator::NAME => Box::new(PageGenerator::new(ownership)),
        ScriptGenerator::NAME => Box::new(ScriptGenerator::new(ownership)),
        TestGenerator::NAME => Box::new(TestGenerator::new(ownership)),
        _ => return None,
    };
    Some(generator)
}
