use crate::error::CommandFailure;

/// Parsed intent for one run. Built once from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowRequest {
    /// Commit message override; the configured default is used when `None`.
    pub commit_message: Option<String>,
    /// Branch to create and check out before committing.
    pub new_branch: Option<String>,
    /// Show the working-tree diff and ask before committing.
    pub show_diff: bool,
    /// Squash the last two commits after committing.
    pub squash: bool,
    /// Hand over to `git rebase -i` after the squash step.
    pub interactive_rebase: bool,
    /// Tag to create and push once the push succeeded.
    pub tag: Option<String>,
}

/// Whether a command is spawned or only recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Execute,
    Simulate,
}

impl ExecutionMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            ExecutionMode::Simulate
        } else {
            ExecutionMode::Execute
        }
    }
}

/// Result of running a command once or through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub attempts_used: u32,
    pub last_error: Option<CommandFailure>,
}

impl ExecutionOutcome {
    pub fn success(attempts_used: u32) -> Self {
        Self {
            attempts_used,
            last_error: None,
        }
    }

    pub fn failure(attempts_used: u32, failure: CommandFailure) -> Self {
        Self {
            attempts_used,
            last_error: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.last_error.is_none()
    }
}

/// What happened at the push gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    Pushed { attempts: u32 },
    Declined,
    Failed { attempts: u32 },
}

impl PushStatus {
    pub fn succeeded(self) -> bool {
        matches!(self, PushStatus::Pushed { .. })
    }
}

/// What happened to the requested tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStatus {
    NotRequested,
    Created(String),
    Skipped(String),
}

/// Summary of a workflow that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub commit_message: String,
    pub branch: Option<String>,
    pub push: PushStatus,
    pub tag: TagStatus,
}

/// Terminal state of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Every step ran; the push may still have been declined.
    Completed(WorkflowReport),
    /// The operator declined the diff review before anything was changed.
    Aborted,
}
