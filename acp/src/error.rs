//! Error taxonomy for workflow runs.

use std::fmt;

use thiserror::Error;

/// Why a single external command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Rendered command line, e.g. `git push`.
    pub command: String,
    /// Exit code when the process exited normally.
    pub exit_code: Option<i32>,
    /// Human-readable cause (exit status, signal, or spawn error).
    pub detail: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.command, self.detail)
    }
}

/// Errors surfaced by the workflow and its collaborators.
#[derive(Debug, Error)]
pub enum AcpError {
    /// A spawned command exited non-zero or could not be spawned.
    #[error("command failed: {0}")]
    CommandFailed(CommandFailure),

    /// The push used every permitted attempt without success.
    #[error("`{command}` failed after {attempts} attempt(s): {last}")]
    RetryExhausted {
        command: String,
        attempts: u32,
        last: CommandFailure,
    },

    /// Malformed or unknown command-line input.
    #[error("usage error: {0}")]
    Usage(String),

    /// `$SHELL` names a shell with no known configuration layout.
    #[error(
        "unsupported or unknown shell: '{0}' (supported: {})",
        crate::core::shell::supported().collect::<Vec<_>>().join(", ")
    )]
    UnsupportedShell(String),

    /// Reading the operator's answer failed.
    #[error("read confirmation input")]
    Prompt(#[source] std::io::Error),
}

impl AcpError {
    /// Exit code of the failed command, when there is one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            AcpError::CommandFailed(failure) => failure.exit_code,
            AcpError::RetryExhausted { last, .. } => last.exit_code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_exhausted_message_names_command_and_attempts() {
        let err = AcpError::RetryExhausted {
            command: "git push".to_string(),
            attempts: 3,
            last: CommandFailure {
                command: "git push".to_string(),
                exit_code: Some(128),
                detail: "exited with status 128".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("`git push` failed after 3 attempt(s)"));
        assert!(msg.contains("128"));
        assert_eq!(err.exit_code(), Some(128));
    }

    #[test]
    fn shell_errors_carry_no_exit_code() {
        let err = AcpError::UnsupportedShell("/bin/elvish".to_string());
        assert_eq!(err.exit_code(), None);
        let msg = err.to_string();
        assert!(msg.starts_with("unsupported or unknown shell: '/bin/elvish'"));
        assert!(msg.contains("bash, zsh, fish"));
    }
}
