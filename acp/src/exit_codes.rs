//! Stable exit codes for the `acp` CLI.

/// Workflow finished, help/version was printed, or the push was declined.
pub const OK: i32 = 0;
/// Operator declined the diff review; nothing was changed.
pub const DECLINED: i32 = 0;
/// Usage error, unsupported shell, invalid config, or a failed git command.
pub const FAILURE: i32 = 1;
