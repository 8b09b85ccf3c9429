//! Ordered step list for one workflow run.
//!
//! The plan is linear: optional steps are either present or absent, and the
//! orchestrator walks the list front to back. Runtime decisions (gates, the
//! push result) are left to the orchestrator.

use crate::core::types::WorkflowRequest;

/// One sub-operation of the workflow, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show `git diff` and ask before touching anything.
    DiffReview,
    /// `git checkout -b <branch>` so the commit lands on the new branch.
    CreateBranch(String),
    /// Stage everything, then commit.
    Commit { message: String },
    /// Collapse the two most recent commits.
    Squash,
    /// Hand control to `git rebase -i`.
    InteractiveRebase,
    /// Ask, then push through the retry loop.
    Push { new_branch: Option<String> },
    /// Create and push a tag, only when the push succeeded.
    TagIfPushed(String),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::DiffReview => "diff-review",
            Step::CreateBranch(_) => "create-branch",
            Step::Commit { .. } => "commit",
            Step::Squash => "squash",
            Step::InteractiveRebase => "interactive-rebase",
            Step::Push { .. } => "push",
            Step::TagIfPushed(_) => "tag",
        }
    }
}

/// Build the step list for `request`, falling back to `default_message`.
pub fn plan_steps(request: &WorkflowRequest, default_message: &str) -> Vec<Step> {
    let mut steps = Vec::with_capacity(7);
    if request.show_diff {
        steps.push(Step::DiffReview);
    }
    if let Some(branch) = &request.new_branch {
        steps.push(Step::CreateBranch(branch.clone()));
    }
    steps.push(Step::Commit {
        message: request
            .commit_message
            .clone()
            .unwrap_or_else(|| default_message.to_string()),
    });
    if request.squash {
        steps.push(Step::Squash);
    }
    if request.interactive_rebase {
        steps.push(Step::InteractiveRebase);
    }
    steps.push(Step::Push {
        new_branch: request.new_branch.clone(),
    });
    if let Some(tag) = &request.tag {
        steps.push(Step::TagIfPushed(tag.clone()));
    }
    steps
}
