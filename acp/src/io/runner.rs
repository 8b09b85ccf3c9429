//! The single boundary where external processes are spawned.
//!
//! The [`CommandRunner`] trait decouples the workflow from real process
//! execution. [`ProcessRunner`] honours dry-run by recording invocations
//! instead of spawning; tests use scripted runners from `test_support`.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info, instrument, warn};

use crate::core::command::CommandSpec;
use crate::core::types::{ExecutionMode, ExecutionOutcome};
use crate::error::{AcpError, CommandFailure};

/// A command as it was handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: CommandSpec,
    pub mode: ExecutionMode,
}

/// Abstraction over command execution backends.
pub trait CommandRunner {
    /// Run `command` once with inherited stdio. Failures are returned in the
    /// outcome, never raised.
    fn run(&self, command: &CommandSpec) -> ExecutionOutcome;

    /// Run a read-only command and return its stdout.
    fn capture(&self, command: &CommandSpec) -> Result<String, AcpError>;
}

/// Runner that spawns real processes, or only records them in dry-run.
#[derive(Debug)]
pub struct ProcessRunner {
    mode: ExecutionMode,
    workdir: Option<PathBuf>,
    invocations: RefCell<Vec<CommandInvocation>>,
}

impl ProcessRunner {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            workdir: None,
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Run commands in `workdir` instead of the current directory.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Every command handed to this runner, in order.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Command lines that were recorded without being spawned.
    pub fn simulated(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter(|inv| inv.mode == ExecutionMode::Simulate)
            .map(|inv| inv.command.command_line())
            .collect()
    }

    fn record(&self, command: &CommandSpec) {
        self.invocations.borrow_mut().push(CommandInvocation {
            command: command.clone(),
            mode: self.mode,
        });
    }

    fn build(&self, command: &CommandSpec) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %command))]
    fn run(&self, command: &CommandSpec) -> ExecutionOutcome {
        self.record(command);
        if self.mode == ExecutionMode::Simulate {
            info!("Dry-run: {command}");
            return ExecutionOutcome::success(1);
        }

        debug!("spawning child process");
        let status = self
            .build(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();
        match status {
            Ok(status) if status.success() => {
                debug!("command finished");
                ExecutionOutcome::success(1)
            }
            Ok(status) => {
                let failure = failure_from_status(command, status);
                warn!(exit_code = ?failure.exit_code, "{failure}");
                ExecutionOutcome::failure(1, failure)
            }
            Err(err) => {
                let failure = spawn_failure(command, &err);
                warn!("{failure}");
                ExecutionOutcome::failure(1, failure)
            }
        }
    }

    #[instrument(skip_all, fields(command = %command))]
    fn capture(&self, command: &CommandSpec) -> Result<String, AcpError> {
        self.record(command);
        if self.mode == ExecutionMode::Simulate {
            info!("Dry-run: {command}");
            return Ok(String::new());
        }

        let output = self
            .build(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| AcpError::CommandFailed(spawn_failure(command, &err)))?;
        if !output.status.success() {
            let mut failure = failure_from_status(command, output.status);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                failure.detail = format!("{}: {}", failure.detail, stderr.trim());
            }
            return Err(AcpError::CommandFailed(failure));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn failure_from_status(command: &CommandSpec, status: ExitStatus) -> CommandFailure {
    CommandFailure {
        command: command.command_line(),
        exit_code: status.code(),
        detail: describe_status(status),
    }
}

fn spawn_failure(command: &CommandSpec, err: &std::io::Error) -> CommandFailure {
    CommandFailure {
        command: command.command_line(),
        exit_code: None,
        detail: format!("could not be spawned: {err}"),
    }
}

#[cfg(unix)]
fn describe_status(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => format!("exited with status {code}"),
        (None, Some(signal)) => format!("terminated by signal {signal}"),
        (None, None) => "exited abnormally".to_string(),
    }
}

#[cfg(not(unix))]
fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "exited abnormally".to_string(),
    }
}
