//! External command descriptions and the git invocations the workflow uses.

use std::fmt;

/// A program plus its arguments. Spawned directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-line rendering used in logs and dry-run records.
    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", quote_arg(arg))?;
        }
        Ok(())
    }
}

fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '`'));
    if !needs_quotes {
        return arg.to_string();
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Builders for every git call the workflow makes.
pub mod git {
    use super::CommandSpec;

    pub fn diff() -> CommandSpec {
        CommandSpec::new("git", ["diff"])
    }

    pub fn checkout_new_branch(branch: &str) -> CommandSpec {
        CommandSpec::new("git", ["checkout", "-b", branch])
    }

    pub fn add_all() -> CommandSpec {
        CommandSpec::new("git", ["add", "."])
    }

    pub fn commit(message: &str) -> CommandSpec {
        CommandSpec::new("git", ["commit", "-m", message])
    }

    /// Squash always targets exactly the two most recent commits.
    pub fn squash_last_two() -> CommandSpec {
        CommandSpec::new("git", ["rebase", "-i", "HEAD~2"])
    }

    pub fn interactive_rebase() -> CommandSpec {
        CommandSpec::new("git", ["rebase", "-i"])
    }

    /// Plain `git push`, or `git push -u <remote> <branch>` for a branch
    /// created during this run (it has no upstream yet).
    pub fn push(remote: &str, new_branch: Option<&str>) -> CommandSpec {
        match new_branch {
            Some(branch) => CommandSpec::new("git", ["push", "-u", remote, branch]),
            None => CommandSpec::new("git", ["push"]),
        }
    }

    pub fn tag(name: &str) -> CommandSpec {
        CommandSpec::new("git", ["tag", name])
    }

    pub fn push_tag(remote: &str, name: &str) -> CommandSpec {
        CommandSpec::new("git", ["push", remote, name])
    }
}
