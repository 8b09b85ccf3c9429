//! Resolves the operator's shell and its startup files from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::shell::{self, ShellProfile};
use crate::error::AcpError;

/// Absolute locations of the detected shell's startup files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub shell: &'static str,
    pub config_dir: PathBuf,
    pub rc_file: PathBuf,
    pub profile_file: PathBuf,
}

impl ShellConfig {
    fn from_profile(profile: &ShellProfile, home: &Path) -> Self {
        Self {
            shell: profile.name,
            config_dir: home.join(profile.config_dir),
            rc_file: home.join(profile.rc_file),
            profile_file: home.join(profile.profile_file),
        }
    }
}

/// Detect the shell from a `$SHELL` value such as `/usr/bin/zsh`.
pub fn detect_shell(shell_env: &str, home: &Path) -> Result<ShellConfig, AcpError> {
    let name = Path::new(shell_env.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let profile =
        shell::lookup(name).ok_or_else(|| AcpError::UnsupportedShell(shell_env.to_string()))?;
    Ok(ShellConfig::from_profile(profile, home))
}

/// Detect the shell from the process environment.
pub fn detect_from_env() -> Result<ShellConfig> {
    let shell_env = std::env::var("SHELL").unwrap_or_default();
    let home = dirs::home_dir().context("resolve home directory")?;
    Ok(detect_shell(&shell_env, &home)?)
}

/// Log the detected layout and make sure the config directory exists.
///
/// In dry-run the directory is not created.
pub fn prepare(config: &ShellConfig, dry_run: bool) -> Result<()> {
    info!("Detected shell: {}", config.shell);
    info!("Config directory: {}", config.config_dir.display());
    info!("RC file: {}", config.rc_file.display());
    info!("Profile file: {}", config.profile_file.display());

    if config.config_dir.is_dir() {
        return Ok(());
    }
    if dry_run {
        info!("Dry-run: create directory {}", config.config_dir.display());
        return Ok(());
    }
    fs::create_dir_all(&config.config_dir)
        .with_context(|| format!("create {}", config.config_dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_zsh_from_absolute_path() {
        let home = Path::new("/home/op");
        let cfg = detect_shell("/usr/bin/zsh", home).expect("zsh");
        assert_eq!(cfg.shell, "zsh");
        assert_eq!(cfg.rc_file, PathBuf::from("/home/op/.zshrc"));
        assert_eq!(cfg.profile_file, PathBuf::from("/home/op/.zprofile"));
        assert_eq!(cfg.config_dir, PathBuf::from("/home/op/.config/zsh"));
    }

    #[test]
    fn tcsh_is_not_mistaken_for_csh() {
        let cfg = detect_shell("/bin/tcsh", Path::new("/h")).expect("tcsh");
        assert_eq!(cfg.shell, "tcsh");
        assert_eq!(cfg.rc_file, PathBuf::from("/h/.tcshrc"));
    }

    #[test]
    fn unknown_or_empty_shell_is_unsupported() {
        for value in ["", "/usr/bin/nu", "/bin/"] {
            let err = detect_shell(value, Path::new("/h")).unwrap_err();
            assert!(matches!(err, AcpError::UnsupportedShell(ref s) if s == value));
        }
    }

    #[test]
    fn prepare_creates_missing_config_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = detect_shell("/bin/bash", temp.path()).expect("bash");
        prepare(&cfg, false).expect("prepare");
        assert!(temp.path().join(".config/bash").is_dir());
    }

    #[test]
    fn prepare_in_dry_run_leaves_filesystem_alone() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = detect_shell("/bin/fish", temp.path()).expect("fish");
        prepare(&cfg, true).expect("prepare");
        assert!(!temp.path().join(".config").exists());
    }
}
