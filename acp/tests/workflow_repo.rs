//! Workflow runs against real temporary repositories.
//!
//! These drive `Workflow::run` through the process runner to check that
//! commits land where expected and that dry-run records exactly the commands
//! a real run issues.

use std::num::NonZeroU32;

use acp::core::types::{
    ExecutionMode, PushStatus, TagStatus, WorkflowOutcome, WorkflowRequest,
};
use acp::error::AcpError;
use acp::io::config::Configuration;
use acp::io::runner::ProcessRunner;
use acp::test_support::{ScriptedGate, ScriptedRunner, TestRepo};
use acp::workflow::Workflow;

fn full_request() -> WorkflowRequest {
    WorkflowRequest {
        commit_message: Some("fix bug".to_string()),
        new_branch: Some("feature/x".to_string()),
        show_diff: true,
        squash: true,
        interactive_rebase: true,
        tag: Some("v1.2.3".to_string()),
    }
}

#[test]
fn dry_run_records_what_a_real_run_would_execute() {
    let config = Configuration::default();
    let request = full_request();

    let simulated = ProcessRunner::new(ExecutionMode::Simulate);
    Workflow::new(&config, &simulated, &ScriptedGate::new([true, true]))
        .run(&request)
        .expect("dry run");

    let scripted = ScriptedRunner::new();
    Workflow::new(&config, &scripted, &ScriptedGate::new([true, true]))
        .run(&request)
        .expect("scripted run");

    assert_eq!(simulated.simulated(), scripted.calls());
    assert_eq!(simulated.invocations().len(), scripted.calls().len());
}

#[test]
fn dry_run_leaves_repository_untouched() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("base.txt", "base", "base").expect("base");
    repo.write_file("pending.txt", "pending").expect("write");
    let config = Configuration {
        dry_run: true,
        ..Configuration::default()
    };
    let runner = ProcessRunner::new(ExecutionMode::from_dry_run(config.dry_run))
        .with_workdir(repo.path());

    let outcome = Workflow::new(&config, &runner, &ScriptedGate::new([true, true]))
        .run(&full_request())
        .expect("run");

    assert!(matches!(outcome, WorkflowOutcome::Completed(_)));
    assert_eq!(repo.commit_count().expect("count"), 1);
    assert_eq!(repo.head_message().expect("message"), "base");
    assert!(repo.tags().expect("tags").is_empty());
    assert_ne!(repo.current_branch().expect("branch"), "feature/x");
    assert!(repo.git(&["status", "--porcelain"]).expect("status").contains("pending.txt"));
}

#[test]
fn commit_lands_on_new_branch() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("base.txt", "base", "base").expect("base");
    repo.write_file("feature.txt", "feature").expect("write");
    let config = Configuration::default();
    let runner = repo.runner();
    let request = WorkflowRequest {
        commit_message: Some("add feature".to_string()),
        new_branch: Some("feature/x".to_string()),
        ..WorkflowRequest::default()
    };

    let outcome = Workflow::new(&config, &runner, &ScriptedGate::new([false]))
        .run(&request)
        .expect("run");

    let WorkflowOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };
    assert_eq!(report.push, PushStatus::Declined);
    assert_eq!(report.branch.as_deref(), Some("feature/x"));
    assert_eq!(repo.current_branch().expect("branch"), "feature/x");
    assert_eq!(repo.head_message().expect("message"), "add feature");
    assert_eq!(repo.commit_count().expect("count"), 2);
}

#[test]
fn squash_with_single_commit_propagates_failure() {
    let repo = TestRepo::new().expect("repo");
    repo.write_file("first.txt", "first").expect("write");
    let config = Configuration::default();
    let runner = repo.runner();
    let gate = ScriptedGate::new([true]);
    let request = WorkflowRequest {
        new_branch: Some("feature/x".to_string()),
        squash: true,
        ..WorkflowRequest::default()
    };

    let err = Workflow::new(&config, &runner, &gate)
        .run(&request)
        .unwrap_err();

    assert!(matches!(err, AcpError::CommandFailed(ref f) if f.command == "git rebase -i HEAD~2"));
    assert!(gate.prompts().is_empty());
    assert_eq!(repo.commit_count().expect("count"), 1);
}

#[test]
fn push_without_remote_exhausts_retries_and_skips_tag() {
    let repo = TestRepo::new().expect("repo");
    repo.commit_file("base.txt", "base", "base").expect("base");
    repo.write_file("next.txt", "next").expect("write");
    let config = Configuration {
        retry_attempts: NonZeroU32::new(3).expect("non-zero"),
        ..Configuration::default()
    };
    let runner = repo.runner();
    let request = WorkflowRequest {
        tag: Some("v1".to_string()),
        ..WorkflowRequest::default()
    };

    let err = Workflow::new(&config, &runner, &ScriptedGate::new([true]))
        .run(&request)
        .unwrap_err();

    assert!(matches!(err, AcpError::RetryExhausted { attempts: 3, .. }));
    let pushes = runner
        .invocations()
        .iter()
        .filter(|inv| inv.command.command_line() == "git push")
        .count();
    assert_eq!(pushes, 3);
    assert!(repo.tags().expect("tags").is_empty());
    assert_eq!(repo.commit_count().expect("count"), 2);
}

#[test]
fn tag_is_reported_skipped_when_push_declined() {
    let config = Configuration::default();
    let runner = ScriptedRunner::new();
    let request = WorkflowRequest {
        tag: Some("v5".to_string()),
        ..WorkflowRequest::default()
    };

    let outcome = Workflow::new(&config, &runner, &ScriptedGate::new([false]))
        .run(&request)
        .expect("run");

    let WorkflowOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };
    assert_eq!(report.tag, TagStatus::Skipped("v5".to_string()));
    assert_eq!(runner.count("git tag v5"), 0);
}
