//! Yes/no prompts that gate destructive workflow steps.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::AcpError;

/// The only answer that confirms. Compared case-insensitively.
pub const AFFIRMATIVE: &str = "y";

/// Blocks the workflow until the operator answers.
pub trait ConfirmationGate {
    /// `Ok(true)` only for an affirmative answer; everything else declines.
    fn confirm(&self, prompt: &str) -> Result<bool, AcpError>;
}

/// True iff `answer` (line terminator stripped) is the affirmative token.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(['\n', '\r'])
        .eq_ignore_ascii_case(AFFIRMATIVE)
}

/// Gate that writes the question to `output` and reads one line from `input`.
///
/// End of input counts as a decline.
pub struct LineGate<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> LineGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }
}

/// Gate bound to the terminal.
pub fn stdin_gate() -> LineGate<io::StdinLock<'static>, io::Stderr> {
    LineGate::new(io::stdin().lock(), io::stderr())
}

impl<R: BufRead, W: Write> ConfirmationGate for LineGate<R, W> {
    fn confirm(&self, prompt: &str) -> Result<bool, AcpError> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{prompt} (y/n): ").map_err(AcpError::Prompt)?;
            out.flush().map_err(AcpError::Prompt)?;
        }

        let mut answer = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut answer)
            .map_err(AcpError::Prompt)?;
        if read == 0 {
            debug!(prompt, "no input available, treating as decline");
            return Ok(false);
        }
        let confirmed = is_affirmative(&answer);
        debug!(prompt, confirmed, "confirmation answered");
        Ok(confirmed)
    }
}
