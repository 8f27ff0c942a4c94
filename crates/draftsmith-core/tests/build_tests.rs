use draftsmith_artifact::{hash_text, Ownership};
use draftsmith_core::{
    BuildOptions, DecisionAction, Forge, ForgeError, SkipReason, StaticConventions, WriteReason,
};
use draftsmith_generators::Conventions;
use draftsmith_ledger::LedgerStore;
use draftsmith_test_utils::{
    FailingFilesystem, TempProject, BLOG_DRAFT, BROKEN_COLUMN_DRAFT, POST_DRAFT,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const REQUEST: &str = "app/Http/Requests/PostRequest.php";

fn ledger(project: &TempProject) -> draftsmith_ledger::LedgerState {
    LedgerStore::new(project.ledger_path(), "test").load().unwrap()
}

#[test]
fn first_build_writes_everything_and_records_it() {
    let project = TempProject::with_draft(BLOG_DRAFT);
    let result = project.forge().build(None, &BuildOptions::new());

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.exit_code(), 0);
    assert!(result.skipped.is_empty());
    assert!(result
        .decisions
        .iter()
        .all(|d| d.action == DecisionAction::Write(WriteReason::New)));
    for (path, record) in &result.generated {
        assert!(path.is_file(), "{} missing", path.display());
        assert_eq!(&record.path, path);
        assert_eq!(
            record.content_hash,
            hash_text(&std::fs::read_to_string(path).unwrap())
        );
    }

    let state = ledger(&project);
    assert_eq!(state.generated.len(), result.generated.len());
    for (path, record) in &result.generated {
        assert_eq!(state.record(path), Some(record));
    }
    assert_eq!(
        state.draft_hash(&project.draft_path()),
        Some(&hash_text(BLOG_DRAFT))
    );
    assert_eq!(state.version, draftsmith_core::VERSION);
    assert!(state.last_run.is_some());
    assert_eq!(
        state.generated_path_for_table("posts"),
        Some(
            project
                .path("database/migrations/create_posts_table.php")
                .as_path()
        )
    );
}

#[test]
fn second_build_of_unchanged_draft_is_a_no_op() {
    let project = TempProject::with_draft(BLOG_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);
    let before = project.snapshot();

    let again = forge.build(None, &BuildOptions::new());
    assert!(again.success);
    assert!(again.up_to_date);
    assert!(again.generated.is_empty());
    assert_eq!(again.exit_code(), 0);
    assert_eq!(project.snapshot(), before);
}

#[test]
fn model_only_build_of_post_writes_one_file() {
    let project = TempProject::with_draft(POST_DRAFT);
    let result = project
        .forge()
        .build(None, &BuildOptions::new().with_only(["model"]));

    assert!(result.success);
    let model = project.path("app/Models/Post.php");
    assert_eq!(result.generated.keys().collect::<Vec<_>>(), vec![&model]);
    assert_eq!(result.generated[&model].ownership, Ownership::Regenerate);
    assert!(result.decisions.iter().all(|d| d.generator == "model"));
    assert!(!project.path("database/migrations").exists());
}

#[test]
fn only_bypasses_the_unchanged_short_circuit() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);

    let result = forge.build(None, &BuildOptions::new().with_only(["model"]));
    assert!(result.success);
    assert!(!result.up_to_date);
    assert!(result.generated.is_empty());
    assert_eq!(
        result.decisions[0].action,
        DecisionAction::Skip(SkipReason::Unchanged)
    );
}

#[test]
fn convention_source_supplies_ownership_defaults() {
    let project = TempProject::with_draft(POST_DRAFT);
    let conventions = Conventions::default()
        .with_ownership("model", Ownership::ScaffoldOnly)
        .with_ownership("request", Ownership::ScaffoldOnly);
    let config = project
        .config()
        .with_ownership("request", Ownership::Regenerate);
    let forge = Forge::new(config)
        .unwrap()
        .with_convention_source(Box::new(StaticConventions::new(conventions)));

    let result = forge.build(None, &BuildOptions::new());
    assert!(result.success, "{:?}", result.errors);
    let model = project.path("app/Models/Post.php");
    assert_eq!(result.generated[&model].ownership, Ownership::ScaffoldOnly);
    assert_eq!(
        result.generated[&project.path(REQUEST)].ownership,
        Ownership::Regenerate
    );
    assert_eq!(
        ledger(&project).record(&model).unwrap().ownership,
        Ownership::ScaffoldOnly
    );
}

#[test]
fn unknown_only_name_is_fatal() {
    let project = TempProject::with_draft(POST_DRAFT);
    let err = project
        .forge()
        .try_build(None, &BuildOptions::new().with_only(["widget"]))
        .unwrap_err();
    assert!(matches!(err, ForgeError::UnknownGenerator(_)));
    assert!(err.to_string().contains("widget"));
    assert!(!project.ledger_path().exists());
}

#[test]
fn changed_draft_rewrites_regenerate_files() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);

    project.write_draft(&format!("{POST_DRAFT}    slug: string unique\n"));
    let result = forge.build(None, &BuildOptions::new());
    assert!(result.success);

    let model = project.path("app/Models/Post.php");
    let decision = result.decisions.iter().find(|d| d.path == model).unwrap();
    assert_eq!(decision.action, DecisionAction::Write(WriteReason::Changed));
    assert!(project.read("app/Models/Post.php").unwrap().contains("'slug'"));
}

#[test]
fn scaffold_only_file_is_protected_without_force() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);
    let request = project.path(REQUEST);
    let recorded = ledger(&project).record(&request).cloned().unwrap();
    assert_eq!(recorded.ownership, Ownership::ScaffoldOnly);

    project.write(REQUEST, "<?php // hand edited\n");
    project.write_draft(&format!("{POST_DRAFT}    slug: string unique\n"));
    let result = forge.build(None, &BuildOptions::new());

    assert!(result.success);
    assert!(result.skipped.contains(&request));
    assert!(!result.generated.contains_key(&request));
    let warning = result
        .warnings
        .iter()
        .find(|w| w.contains(&request.display().to_string()))
        .expect("warning naming the request file");
    assert!(warning.contains("scaffold_only"));
    assert_eq!(project.read(REQUEST).unwrap(), "<?php // hand edited\n");
    assert_eq!(ledger(&project).record(&request), Some(&recorded));
}

#[test]
fn force_overwrites_scaffold_only_file_and_updates_hash() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);
    let request = project.path(REQUEST);

    project.write(REQUEST, "<?php // hand edited\n");
    project.write_draft(&format!("{POST_DRAFT}    slug: string unique\n"));
    let result = forge.build(None, &BuildOptions::new().with_force(true));

    assert!(result.success);
    assert!(result.generated.contains_key(&request));
    assert!(result.warnings.is_empty());
    let content = project.read(REQUEST).unwrap();
    assert!(content.contains("'slug'"));
    assert_eq!(
        ledger(&project).record(&request).unwrap().content_hash,
        hash_text(&content)
    );
}

#[test]
fn generation_error_leaves_project_untouched() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);
    let before = project.snapshot();

    project.write_draft(BROKEN_COLUMN_DRAFT);
    let before_with_draft = {
        let mut files = before;
        files.insert(PathBuf::from("draft.yaml"), BROKEN_COLUMN_DRAFT.as_bytes().to_vec());
        files
    };
    let result = forge.build(None, &BuildOptions::new());

    assert!(!result.success);
    assert_eq!(result.exit_code(), 1);
    assert!(result.generated.is_empty());
    assert!(result.errors[0].contains("Post"));
    assert_eq!(project.snapshot(), before_with_draft);
}

#[test]
fn missing_draft_is_reported() {
    let project = TempProject::new();
    let err = project
        .forge()
        .try_build(None, &BuildOptions::new())
        .unwrap_err();
    assert!(matches!(err, ForgeError::DraftNotFound { .. }));
    assert!(err.to_string().contains("draft.yaml"));
    assert!(project.snapshot().is_empty());
}

#[test]
fn write_failure_rolls_back_earlier_writes() {
    let project = TempProject::with_draft(POST_DRAFT);
    // pre-existing file the run would overwrite
    project.write("app/Models/Post.php", "<?php // before\n");

    let forge = project.forge_with_fs(FailingFilesystem::on_nth_write(3));
    let err = forge.try_build(None, &BuildOptions::new()).unwrap_err();

    match &err {
        ForgeError::Write {
            restored,
            rollback_failures,
            ..
        } => {
            // two written files plus the target that failed
            assert_eq!(*restored, 3);
            assert!(rollback_failures.is_empty());
        }
        other => panic!("expected write error, got {other:?}"),
    }
    assert!(!err.is_pre_write());
    assert_eq!(project.read("app/Models/Post.php").unwrap(), "<?php // before\n");
    assert!(!project
        .path("database/migrations/create_posts_table.php")
        .exists());
    assert!(!project.ledger_path().exists());
}

#[test]
fn partially_written_target_is_restored() {
    let project = TempProject::with_draft(POST_DRAFT);
    project.write("app/Models/Post.php", "<?php // before\n");

    let forge = project
        .forge_with_fs(FailingFilesystem::on_path_suffix("Models/Post.php").truncating());
    let err = forge.try_build(None, &BuildOptions::new()).unwrap_err();

    match &err {
        ForgeError::Write {
            path,
            rollback_failures,
            ..
        } => {
            assert!(path.ends_with("app/Models/Post.php"));
            assert!(rollback_failures.is_empty());
        }
        other => panic!("expected write error, got {other:?}"),
    }
    assert_eq!(project.read("app/Models/Post.php").unwrap(), "<?php // before\n");
    assert!(!project.ledger_path().exists());
}

#[test]
fn force_restores_hand_edited_scaffold_file_of_unchanged_draft() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    assert!(forge.build(None, &BuildOptions::new()).success);
    let request = project.path(REQUEST);
    let generated = project.read(REQUEST).unwrap();
    project.write(REQUEST, "<?php // hand edited\n");

    let protected = forge.build(None, &BuildOptions::new().with_only(["request"]));
    assert!(protected.success);
    assert_eq!(
        protected.decisions[0].action,
        DecisionAction::Skip(SkipReason::Protected)
    );
    assert_eq!(protected.warnings.len(), 1);
    assert!(protected.warnings[0].contains(&request.display().to_string()));
    assert_eq!(project.read(REQUEST).unwrap(), "<?php // hand edited\n");

    let forced = forge.build(
        None,
        &BuildOptions::new().with_only(["request"]).with_force(true),
    );
    assert!(forced.success);
    assert_eq!(
        forced.decisions[0].action,
        DecisionAction::Write(WriteReason::Forced)
    );
    assert!(forced.generated.contains_key(&request));
    assert!(forced.warnings.is_empty());
    assert_eq!(project.read(REQUEST).unwrap(), generated);
}

#[cfg(unix)]
#[test]
fn relative_and_absolute_roots_share_ledger_records() {
    let project = TempProject::with_draft(POST_DRAFT);
    let relative = project.config().with_output_root(project.relative_root());
    assert!(relative.output_root.is_relative());
    let forge = Forge::new(relative).unwrap();
    assert_eq!(forge.config().output_root, project.root());
    assert!(forge.build(None, &BuildOptions::new()).success);

    let request = project.path(REQUEST);
    assert!(ledger(&project).record(&request).is_some());

    project.write(REQUEST, "<?php // hand edited\n");
    project.write_draft(&format!("{POST_DRAFT}    slug: string unique\n"));
    let result = project.forge().build(None, &BuildOptions::new());

    assert!(result.success);
    let decision = result.decisions.iter().find(|d| d.path == request).unwrap();
    assert_eq!(decision.action, DecisionAction::Skip(SkipReason::Protected));
    assert_eq!(project.read(REQUEST).unwrap(), "<?php // hand edited\n");
}

#[test]
fn write_failure_names_the_file() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge_with_fs(FailingFilesystem::on_path_suffix("PostFactory.php"));
    let result = forge.build(None, &BuildOptions::new());
    assert!(!result.success);
    assert!(result.errors[0].contains("PostFactory.php"));
    assert!(!project.path("app/Models/Post.php").exists());
}

#[cfg(unix)]
#[test]
fn ledger_persist_failure_is_a_warning() {
    let project = TempProject::with_draft(POST_DRAFT);
    project.break_ledger_dir();
    let result = project.forge().build(None, &BuildOptions::new());

    assert!(result.success);
    assert_eq!(result.exit_code(), 0);
    assert!(!result.generated.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("ledger"));
    assert!(result.warnings[0].contains("2 attempt(s)"));
}

#[test]
fn migration_path_is_reused_from_the_ledger() {
    let project = TempProject::with_draft(POST_DRAFT);
    let forge = project.forge();
    let mut config = project.config();
    config.conventions.migrations_dir = PathBuf::from("db/migrations");
    let relocated = Forge::new(config).unwrap();

    assert!(forge.build(None, &BuildOptions::new()).success);
    project.write_draft(&format!("{POST_DRAFT}    slug: string\n"));
    let result = relocated.build(None, &BuildOptions::new());

    assert!(result.success);
    let original = project.path("database/migrations/create_posts_table.php");
    assert!(result.generated.contains_key(&original));
    assert!(!project.path("db/migrations").exists());
}
