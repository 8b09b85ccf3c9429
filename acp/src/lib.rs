//! Add / commit / push automation for git.
//!
//! One invocation stages everything, commits, optionally creates a branch,
//! squashes or rebases, pushes with bounded retry, and tags, pausing for
//! operator confirmation before the irreversible steps.
//!
//! - **[`core`]**: Pure logic (step planning, command descriptions, the shell
//!   table). No I/O.
//! - **[`io`]**: Side effects (process spawning, prompts, config files, the
//!   shell environment), isolated behind traits so tests can script them.
//!
//! [`workflow`] and [`retry`] combine the two into the run that `acp`
//! performs.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod retry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workflow;
