//! draftsmith command-line interface
//!
//! ```text
//! draftsmith build    [DRAFT] [--only model,migration] [--force] [--json]
//! draftsmith plan     [DRAFT] [--only ...] [--force] [--json]
//! draftsmith validate [DRAFT]
//! draftsmith draft    <DESCRIPTION> [--draft PATH]
//! ```
//!
//! Exit code 0 for completed runs (including no-op builds), 1 otherwise.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use draftsmith_core::{
    BuildOptions, BuildResult, Drafter, Forge, ForgeConfig, PlanResult, TemplateBackend,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn draft_arg() -> Arg {
    Arg::new("draft")
        .value_parser(value_parser!(PathBuf))
        .help("Draft file (default: configured draft_path)")
}

fn only_arg() -> Arg {
    Arg::new("only")
        .long("only")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .help("Run only these generators (comma separated)")
}

fn force_arg() -> Arg {
    Arg::new("force")
        .long("force")
        .action(ArgAction::SetTrue)
        .help("Overwrite scaffold_only files that differ from the draft")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the result as JSON")
}

fn cli() -> Command {
    Command::new("draftsmith")
        .version(draftsmith_core::VERSION)
        .about("Idempotent scaffolding from a YAML draft")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project directory"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: <root>/draftsmith.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("build")
                .about("Generate files for a changed draft")
                .arg(draft_arg())
                .arg(only_arg())
                .arg(force_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("plan")
                .about("Show what build would do, without writing")
                .arg(draft_arg())
                .arg(only_arg())
                .arg(force_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a draft and list every problem")
                .arg(draft_arg()),
        )
        .subcommand(
            Command::new("draft")
                .about("Draft models from a description and merge them into the draft")
                .arg(
                    Arg::new("description")
                        .required(true)
                        .help("What the application should contain"),
                )
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .value_parser(value_parser!(PathBuf))
                        .help("Draft file to merge into"),
                ),
        )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &ArgMatches) -> anyhow::Result<ForgeConfig> {
    let root = args
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    match args.get_one::<PathBuf>("config") {
        Some(path) => {
            let config = ForgeConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            let output_root = root.join(&config.output_root);
            Ok(config.with_output_root(output_root))
        }
        None => ForgeConfig::discover(&root).context("loading config"),
    }
}

fn build_options(args: &ArgMatches) -> BuildOptions {
    let only = args
        .get_many::<String>("only")
        .map(|names| names.cloned().collect());
    BuildOptions {
        only,
        force: args.get_flag("force"),
    }
}

fn print_build(result: &BuildResult) {
    if result.up_to_date {
        println!("Draft unchanged; nothing to do.");
        return;
    }
    for decision in &result.decisions {
        println!("  {:<20} {}", decision.action.to_string(), decision.path.display());
    }
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    for error in &result.errors {
        eprintln!("error: {error}");
    }
    if result.success {
        println!(
            "{} file(s) written, {} skipped.",
            result.generated.len(),
            result.skipped.len()
        );
    }
}

fn print_plan(plan: &PlanResult) {
    if plan.up_to_date {
        println!("Draft unchanged; build would do nothing.");
        return;
    }
    for decision in &plan.decisions {
        println!("  {:<20} {}", decision.action.to_string(), decision.path.display());
    }
    for warning in &plan.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{} file(s) would be written.", plan.writes().len());
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let Some((name, args)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    let config = load_config(args)?;
    tracing::debug!(
        command = name,
        output_root = %config.output_root.display(),
        "configuration loaded"
    );
    let draft = args.get_one::<PathBuf>("draft").map(PathBuf::as_path);

    match name {
        "build" => {
            let forge = Forge::new(config)?;
            let result = forge.build(draft, &build_options(args));
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_build(&result);
            }
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        "plan" => {
            let forge = Forge::new(config)?;
            let plan = forge.plan_with(draft, &build_options(args))?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
            Ok(ExitCode::SUCCESS)
        }
        "validate" => {
            let forge = Forge::new(config)?;
            let errors = forge.validate(draft);
            if errors.is_empty() {
                println!("Draft is valid.");
                return Ok(ExitCode::SUCCESS);
            }
            for error in &errors {
                eprintln!("error: {error}");
            }
            Ok(ExitCode::FAILURE)
        }
        "draft" => {
            let description = args
                .get_one::<String>("description")
                .context("description is required")?;
            let path = config.resolve_draft_path(draft);
            let merged = Drafter::new(TemplateBackend).draft(description, &path)?;
            println!(
                "Draft {} now has {} model(s), {} action(s), {} page(s).",
                path.display(),
                merged.models.len(),
                merged.actions.len(),
                merged.pages.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        other => anyhow::bail!("unknown command '{other}'"),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let verbose = matches
        .subcommand()
        .is_some_and(|(_, args)| args.get_flag("verbose"));
    init_logging(verbose);

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
