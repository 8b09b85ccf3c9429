//! `acp`: stage, commit, and push in one confirmed step.
//!
//! Loads `acp.toml`, applies CLI flags, detects the operator's shell, then runs
//! the workflow against the real `git` (or records it with `--dry-run`).

use std::env;

use acp::core::types::{
    ExecutionMode, PushStatus, TagStatus, WorkflowOutcome, WorkflowRequest,
};
use acp::error::AcpError;
use acp::exit_codes;
use acp::io::config::{CONFIG_ENV, ConfigOverrides, config_path, load_config};
use acp::io::confirm::stdin_gate;
use acp::io::runner::ProcessRunner;
use acp::io::shell;
use acp::logging;
use acp::workflow::Workflow;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "acp",
    version,
    about = "Stage, commit, and push in one step, with confirmation gates"
)]
struct Cli {
    /// Commit message (defaults to `default_commit_message` from the config).
    #[arg(short = 'm', long = "message", value_name = "MSG", allow_hyphen_values = true)]
    message: Option<String>,

    /// Create and check out this branch before committing.
    #[arg(short = 'b', long = "branch", value_name = "NAME")]
    branch: Option<String>,

    /// Show the working tree diff and ask before committing.
    #[arg(short = 'd', long = "diff")]
    diff: bool,

    /// Squash the last two commits after committing.
    #[arg(short = 's', long = "squash")]
    squash: bool,

    /// Run `git rebase -i` after the squash step.
    #[arg(short = 'i', long = "interactive-rebase")]
    interactive_rebase: bool,

    /// Create and push this tag once the push succeeded.
    #[arg(short = 't', long = "tag", value_name = "NAME")]
    tag: Option<String>,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print the git commands instead of running them.
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            verbose: self.verbose,
            dry_run: self.dry_run,
        }
    }

    fn request(&self) -> Result<WorkflowRequest, AcpError> {
        Ok(WorkflowRequest {
            commit_message: non_blank("--message", self.message.as_deref())?,
            new_branch: non_blank("--branch", self.branch.as_deref())?,
            show_diff: self.diff,
            squash: self.squash,
            interactive_rebase: self.interactive_rebase,
            tag: non_blank("--tag", self.tag.as_deref())?,
        })
    }
}

fn non_blank(flag: &str, value: Option<&str>) -> Result<Option<String>, AcpError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AcpError::Usage(format!("{flag} must not be empty"))),
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return Ok(report_parse_error(&err)),
    };
    let request = cli.request()?;

    let cwd = env::current_dir().context("resolve working directory")?;
    let path = config_path(env::var(CONFIG_ENV).ok().as_deref(), &cwd);
    let config = load_config(&path)?.merge(cli.overrides());

    logging::init(config.verbose, config.log_file.as_deref())?;
    debug!(
        "effective configuration from {}:\n{}",
        path.display(),
        toml::to_string_pretty(&config).context("serialize config")?
    );

    let shell_config = shell::detect_from_env()?;
    shell::prepare(&shell_config, config.dry_run)?;

    let runner = ProcessRunner::new(ExecutionMode::from_dry_run(config.dry_run));
    let gate = stdin_gate();
    let outcome = Workflow::new(&config, &runner, &gate).run(&request)?;

    match outcome {
        WorkflowOutcome::Aborted => Ok(exit_codes::DECLINED),
        WorkflowOutcome::Completed(report) => {
            if let PushStatus::Pushed { attempts } = report.push {
                debug!(attempts, "push attempts used");
            }
            if let TagStatus::Skipped(name) = &report.tag {
                warn!("Tag {name} was not created");
            }
            if config.dry_run {
                info!(
                    "Dry-run finished; {} command(s) recorded",
                    runner.simulated().len()
                );
            }
            info!("Operation completed successfully.");
            Ok(exit_codes::OK)
        }
    }
}

/// Print clap's message; help and version exit cleanly, anything else is a
/// usage error.
fn report_parse_error(err: &clap::Error) -> i32 {
    let code = if err.use_stderr() {
        exit_codes::FAILURE
    } else {
        exit_codes::OK
    };
    if let Err(print_err) = err.print() {
        eprintln!("Error: {print_err}");
    }
    code
}
