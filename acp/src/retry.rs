//! Bounded retry loop for commands expected to fail transiently.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use tracing::{error, instrument, warn};

use crate::core::command::CommandSpec;
use crate::core::types::ExecutionOutcome;
use crate::io::runner::CommandRunner;

/// How often, and how patiently, to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: NonZeroU32,
    /// Pause between attempts. `Duration::ZERO` retries immediately.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn immediate(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Run `command` until it succeeds or `policy.max_attempts` is used up.
///
/// Stops at the first success. `attempts_used` never exceeds `max_attempts`.
#[instrument(skip_all, fields(command = %command, max_attempts = policy.max_attempts.get()))]
pub fn run_with_retry<R: CommandRunner + ?Sized>(
    runner: &R,
    command: &CommandSpec,
    policy: RetryPolicy,
) -> ExecutionOutcome {
    let max = policy.max_attempts.get();
    let mut attempt = 1u32;
    loop {
        let outcome = runner.run(command);
        let Some(failure) = outcome.last_error else {
            return ExecutionOutcome::success(attempt);
        };
        if attempt == max {
            error!("`{command}` failed after {max} attempt(s): {failure}");
            return ExecutionOutcome::failure(attempt, failure);
        }
        warn!("`{command}` failed, retrying ({attempt}/{max})...");
        if !policy.delay.is_zero() {
            thread::sleep(policy.delay);
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::git;
    use crate::test_support::ScriptedRunner;

    fn attempts(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("non-zero")
    }

    #[test]
    fn always_failing_command_uses_every_attempt() {
        for n in 1..=5 {
            let runner = ScriptedRunner::new().always_fail("git push");
            let policy = RetryPolicy::immediate(attempts(n));
            let outcome = run_with_retry(&runner, &git::push("origin", None), policy);
            assert!(!outcome.succeeded());
            assert_eq!(outcome.attempts_used, n);
            assert_eq!(runner.count("git push"), n as usize);
        }
    }

    #[test]
    fn success_on_attempt_k_stops_there() {
        for n in 1..=4u32 {
            for k in 1..=n {
                let runner = ScriptedRunner::new().fail_times("git push", k - 1);
                let policy = RetryPolicy::immediate(attempts(n));
                let outcome = run_with_retry(&runner, &git::push("origin", None), policy);
                assert!(outcome.succeeded(), "n={n} k={k}");
                assert_eq!(outcome.attempts_used, k);
                assert_eq!(runner.count("git push"), k as usize);
            }
        }
    }

    #[test]
    fn exhausted_outcome_keeps_last_failure() {
        let runner = ScriptedRunner::new().always_fail("git push");
        let policy = RetryPolicy::immediate(attempts(2));
        let outcome = run_with_retry(&runner, &git::push("origin", None), policy);
        let failure = outcome.last_error.expect("failure");
        assert_eq!(failure.command, "git push");
        assert_eq!(failure.exit_code, Some(1));
    }

    #[test]
    fn delay_is_applied_between_attempts_only() {
        let runner = ScriptedRunner::new().fail_times("git push", 1);
        let policy = RetryPolicy {
            max_attempts: attempts(3),
            delay: Duration::from_millis(5),
        };
        let started = std::time::Instant::now();
        let outcome = run_with_retry(&runner, &git::push("origin", None), policy);
        assert!(outcome.succeeded());
        assert_eq!(outcome.attempts_used, 2);
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
