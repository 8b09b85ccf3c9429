//! Test-only doubles for the runner and the confirmation gate, plus a
//! throwaway git repository.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::core::command::CommandSpec;
use crate::core::types::{ExecutionMode, ExecutionOutcome};
use crate::error::{AcpError, CommandFailure};
use crate::io::confirm::ConfirmationGate;
use crate::io::runner::{CommandRunner, ProcessRunner};

/// Runner that records command lines and fails the ones it was told to.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    remaining_failures: RefCell<HashMap<String, u32>>,
    calls: RefCell<Vec<String>>,
    diff: String,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `times` runs of `command_line`, then succeed.
    pub fn fail_times(self, command_line: &str, times: u32) -> Self {
        self.remaining_failures
            .borrow_mut()
            .insert(command_line.to_string(), times);
        self
    }

    /// Fail every run of `command_line`.
    pub fn always_fail(self, command_line: &str) -> Self {
        self.fail_times(command_line, u32::MAX)
    }

    /// Text returned by `capture` (the diff).
    pub fn with_diff(mut self, diff: &str) -> Self {
        self.diff = diff.to_string();
        self
    }

    /// Every command line seen, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// How many times `command_line` was run.
    pub fn count(&self, command_line: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.as_str() == command_line)
            .count()
    }

    fn next_failure(&self, line: &str) -> Option<CommandFailure> {
        let mut failures = self.remaining_failures.borrow_mut();
        let remaining = failures.get_mut(line)?;
        if *remaining == 0 {
            return None;
        }
        if *remaining != u32::MAX {
            *remaining -= 1;
        }
        Some(CommandFailure {
            command: line.to_string(),
            exit_code: Some(1),
            detail: "exited with status 1".to_string(),
        })
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec) -> ExecutionOutcome {
        let line = command.command_line();
        self.calls.borrow_mut().push(line.clone());
        match self.next_failure(&line) {
            Some(failure) => ExecutionOutcome::failure(1, failure),
            None => ExecutionOutcome::success(1),
        }
    }

    fn capture(&self, command: &CommandSpec) -> Result<String, AcpError> {
        let line = command.command_line();
        self.calls.borrow_mut().push(line.clone());
        match self.next_failure(&line) {
            Some(failure) => Err(AcpError::CommandFailed(failure)),
            None => Ok(self.diff.clone()),
        }
    }
}

/// Gate that replays canned answers and declines once they run out.
#[derive(Debug, Default)]
pub struct ScriptedGate {
    answers: RefCell<VecDeque<bool>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGate {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&self, prompt: &str) -> Result<bool, AcpError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// Temporary git repository with a local identity configured.
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// Empty repository (no commits yet).
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let repo = Self { dir };
        repo.git(&["init", "--quiet"])?;
        repo.git(&["config", "user.name", "Test User"])?;
        repo.git(&["config", "user.email", "test@example.com"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runner that executes for real inside this repository.
    pub fn runner(&self) -> ProcessRunner {
        ProcessRunner::new(ExecutionMode::Execute).with_workdir(self.path())
    }

    pub fn write_file(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    /// Write `name` and commit it with `message`.
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> Result<()> {
        self.write_file(name, contents)?;
        self.git(&["add", name])?;
        self.git(&["commit", "--quiet", "-m", message])?;
        Ok(())
    }

    /// Number of commits reachable from HEAD (0 for an unborn branch).
    pub fn commit_count(&self) -> Result<usize> {
        match self.git(&["rev-list", "--count", "HEAD"]) {
            Ok(out) => out
                .trim()
                .parse()
                .with_context(|| format!("parse commit count '{}'", out.trim())),
            Err(_) => Ok(0),
        }
    }

    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .git(&["symbolic-ref", "--short", "HEAD"])?
            .trim()
            .to_string())
    }

    pub fn head_message(&self) -> Result<String> {
        Ok(self.git(&["log", "-1", "--format=%s"])?.trim().to_string())
    }

    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(self
            .git(&["tag", "--list"])?
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Run git in the repository and return stdout.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
