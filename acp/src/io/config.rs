//! Settings loaded from `acp.toml` (or `$ACP_CONFIG`).

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "ACP_CONFIG";
/// Config file looked up in the working directory when `ACP_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "acp.toml";

/// Workflow configuration (TOML, or JSON for `.json` paths).
///
/// Missing fields fall back to the defaults below. A value is never mutated
/// after loading; CLI flags produce a new value via [`Configuration::merge`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Total push attempts, including the first one.
    pub retry_attempts: NonZeroU32,

    /// Commit message used when `-m` is not given.
    pub default_commit_message: String,

    pub default_branch: String,

    pub verbose: bool,

    /// Record commands instead of running them.
    pub dry_run: bool,

    /// Pause between push attempts. Zero retries immediately.
    pub retry_delay_ms: u64,

    /// Remote that receives new branches and tags.
    pub remote: String,

    /// Also append log output to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            retry_attempts: NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN),
            default_commit_message: "Auto Commit".to_string(),
            default_branch: "main".to_string(),
            verbose: false,
            dry_run: false,
            retry_delay_ms: 0,
            remote: "origin".to_string(),
            log_file: None,
        }
    }
}

/// Flags from the command line that overlay the loaded configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub verbose: bool,
    pub dry_run: bool,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.default_commit_message.trim().is_empty() {
            return Err(anyhow!("default_commit_message must not be empty"));
        }
        if self.default_branch.trim().is_empty() {
            return Err(anyhow!("default_branch must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(anyhow!("remote must not be empty"));
        }
        Ok(())
    }

    /// Produce a new configuration with CLI flags applied.
    ///
    /// Flags can only switch a setting on; an absent flag keeps the file value.
    pub fn merge(&self, overrides: ConfigOverrides) -> Configuration {
        Configuration {
            verbose: self.verbose || overrides.verbose,
            dry_run: self.dry_run || overrides.dry_run,
            ..self.clone()
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Resolve the config path: `$ACP_CONFIG` if set and non-empty, else `acp.toml`.
pub fn config_path(env_value: Option<&str>, cwd: &Path) -> PathBuf {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => cwd.join(DEFAULT_CONFIG_FILE),
    }
}

/// Load config from a TOML or JSON file.
///
/// If the file is missing, returns `Configuration::default()`.
pub fn load_config(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        let cfg = Configuration::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let cfg: Configuration = if is_json {
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
    } else {
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
    };
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
