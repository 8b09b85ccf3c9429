//! Static table of supported shells and where they keep their startup files.
//!
//! Paths are relative to the operator's home directory.

/// Startup file layout for one shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellProfile {
    pub name: &'static str,
    pub config_dir: &'static str,
    pub rc_file: &'static str,
    pub profile_file: &'static str,
}

const PROFILES: &[ShellProfile] = &[
    ShellProfile {
        name: "bash",
        config_dir: ".config/bash",
        rc_file: ".bashrc",
        profile_file: ".bash_profile",
    },
    ShellProfile {
        name: "zsh",
        config_dir: ".config/zsh",
        rc_file: ".zshrc",
        profile_file: ".zprofile",
    },
    ShellProfile {
        name: "fish",
        config_dir: ".config/fish",
        rc_file: ".config/fish/config.fish",
        profile_file: ".config/fish/config.fish",
    },
    ShellProfile {
        name: "ksh",
        config_dir: ".config/ksh",
        rc_file: ".kshrc",
        profile_file: ".profile",
    },
    ShellProfile {
        name: "tcsh",
        config_dir: ".config/tcsh",
        rc_file: ".tcshrc",
        profile_file: ".login",
    },
    ShellProfile {
        name: "csh",
        config_dir: ".config/csh",
        rc_file: ".cshrc",
        profile_file: ".login",
    },
    ShellProfile {
        name: "ash",
        config_dir: ".config/ash",
        rc_file: ".profile",
        profile_file: ".profile",
    },
    ShellProfile {
        name: "dash",
        config_dir: ".config/dash",
        rc_file: ".profile",
        profile_file: ".profile",
    },
];

/// Look up a shell by its executable name (`zsh`, not `/bin/zsh`).
pub fn lookup(name: &str) -> Option<&'static ShellProfile> {
    PROFILES.iter().find(|profile| profile.name == name)
}

/// Names of every supported shell, in table order.
pub fn supported() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|profile| profile.name)
}
