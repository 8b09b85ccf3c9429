//! Orchestration for one `acp` run: diff review, branch, commit, squash,
//! rebase, push with retry, tag.

use tracing::{debug, error, info, instrument};

use crate::core::command::{CommandSpec, git};
use crate::core::plan::{Step, plan_steps};
use crate::core::types::{
    PushStatus, TagStatus, WorkflowOutcome, WorkflowReport, WorkflowRequest,
};
use crate::error::AcpError;
use crate::io::config::Configuration;
use crate::io::confirm::ConfirmationGate;
use crate::io::runner::CommandRunner;
use crate::retry::{RetryPolicy, run_with_retry};

pub const DIFF_PROMPT: &str = "Do you want to continue with the commit?";
pub const PUSH_PROMPT: &str = "Do you want to push the changes?";

/// Drives the planned steps through a runner and a confirmation gate.
pub struct Workflow<'a, R: ?Sized, G: ?Sized> {
    config: &'a Configuration,
    runner: &'a R,
    gate: &'a G,
}

impl<'a, R, G> Workflow<'a, R, G>
where
    R: CommandRunner + ?Sized,
    G: ConfirmationGate + ?Sized,
{
    pub fn new(config: &'a Configuration, runner: &'a R, gate: &'a G) -> Self {
        Self {
            config,
            runner,
            gate,
        }
    }

    /// Execute every step of `request` in order.
    ///
    /// Returns `Aborted` when the diff review is declined. A failed
    /// non-retried step stops the run with `CommandFailed`. An exhausted push
    /// still lets the tag step decide (it skips), then fails the run with
    /// `RetryExhausted`.
    #[instrument(skip_all)]
    pub fn run(&self, request: &WorkflowRequest) -> Result<WorkflowOutcome, AcpError> {
        let steps = plan_steps(request, &self.config.default_commit_message);
        let mut commit_message = self.config.default_commit_message.clone();
        let mut push = PushStatus::Declined;
        let mut tag = TagStatus::NotRequested;
        let mut exhausted = None;

        for step in &steps {
            debug!(step = step.name(), "running step");
            match step {
                Step::DiffReview => {
                    if !self.review_diff()? {
                        info!("Commit cancelled; nothing was changed");
                        return Ok(WorkflowOutcome::Aborted);
                    }
                }
                Step::CreateBranch(branch) => {
                    self.run_once(&git::checkout_new_branch(branch))?;
                }
                Step::Commit { message } => {
                    self.run_once(&git::add_all())?;
                    self.run_once(&git::commit(message))?;
                    commit_message.clone_from(message);
                }
                Step::Squash => self.run_once(&git::squash_last_two())?,
                Step::InteractiveRebase => self.run_once(&git::interactive_rebase())?,
                Step::Push { new_branch } => {
                    let (status, err) = self.push(new_branch.as_deref())?;
                    push = status;
                    exhausted = err;
                }
                Step::TagIfPushed(name) => tag = self.tag_if_pushed(name, push)?,
            }
        }

        if let Some(err) = exhausted {
            return Err(err);
        }
        Ok(WorkflowOutcome::Completed(WorkflowReport {
            commit_message,
            branch: request.new_branch.clone(),
            push,
            tag,
        }))
    }

    fn review_diff(&self) -> Result<bool, AcpError> {
        let diff = self.runner.capture(&git::diff())?;
        if diff.trim().is_empty() {
            info!("Working tree diff is empty");
        } else {
            info!("\n{}", diff.trim_end());
        }
        self.gate.confirm(DIFF_PROMPT)
    }

    /// Ask, then push through the retry loop. An exhausted push is returned
    /// as a deferred error so the tag step can still be evaluated.
    fn push(
        &self,
        new_branch: Option<&str>,
    ) -> Result<(PushStatus, Option<AcpError>), AcpError> {
        if !self.gate.confirm(PUSH_PROMPT)? {
            info!("Push skipped");
            return Ok((PushStatus::Declined, None));
        }

        let command = git::push(&self.config.remote, new_branch);
        let policy = RetryPolicy {
            max_attempts: self.config.retry_attempts,
            delay: self.config.retry_delay(),
        };
        let outcome = run_with_retry(self.runner, &command, policy);
        match outcome.last_error {
            None => {
                debug!(attempts = outcome.attempts_used, "push succeeded");
                Ok((
                    PushStatus::Pushed {
                        attempts: outcome.attempts_used,
                    },
                    None,
                ))
            }
            Some(last) => {
                error!("Failed to push after {} attempt(s)", outcome.attempts_used);
                let err = AcpError::RetryExhausted {
                    command: command.command_line(),
                    attempts: outcome.attempts_used,
                    last,
                };
                Ok((
                    PushStatus::Failed {
                        attempts: outcome.attempts_used,
                    },
                    Some(err),
                ))
            }
        }
    }

    /// Create the tag and push it, but only after a successful push.
    fn tag_if_pushed(&self, name: &str, push: PushStatus) -> Result<TagStatus, AcpError> {
        if !push.succeeded() {
            info!("Skipping tag {name}: changes were not pushed");
            return Ok(TagStatus::Skipped(name.to_string()));
        }
        let compound = [git::tag(name), git::push_tag(&self.config.remote, name)];
        for command in &compound {
            if let Err(err) = self.run_once(command) {
                error!("Creating tag {name} failed");
                return Err(err);
            }
        }
        info!("Tag {name} created and pushed");
        Ok(TagStatus::Created(name.to_string()))
    }

    fn run_once(&self, command: &CommandSpec) -> Result<(), AcpError> {
        let outcome = self.runner.run(command);
        match outcome.last_error {
            None => Ok(()),
            Some(failure) => {
                error!(exit_code = ?failure.exit_code, "{failure}");
                Err(AcpError::CommandFailed(failure))
            }
        }
    }
}
