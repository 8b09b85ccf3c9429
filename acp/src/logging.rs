//! Tracing setup for the `acp` binary.
//!
//! All operator-facing messages (dry-run lines, diff output, retry notices)
//! are `tracing` events written to stderr. `RUST_LOG` overrides the level
//! chosen from the verbose flag.

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "acp=debug" } else { "acp=info" }
}

/// Initialize the tracing subscriber.
///
/// Output: stderr, compact, no timestamps, colored only on a terminal. When
/// `log_file` is set, events are also appended to that file without ANSI
/// colors.
///
/// # Example
/// ```bash
/// RUST_LOG=acp=trace acp -n -m "wip"
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time()
                .with_target(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_directive(false), "acp=info");
        assert_eq!(default_directive(true), "acp=debug");
    }

    #[test]
    fn log_file_is_created_with_parents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("logs/acp.log");
        open_log_file(&path).expect("open");
        assert!(path.is_file());
    }
}
