//! Platform-specific shell detection.
//!
//! Used to decide which profile file receives persisted environment
//! changes on Unix-like systems.

use std::path::{Path, PathBuf};

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Unknown,
        }
    }

    /// Profile file, relative to the home directory, that an interactive
    /// shell of this type reads on startup.
    ///
    /// Shells without a dedicated file fall back to `.profile`.
    pub fn profile_file(&self) -> &'static str {
        match self {
            ShellType::Bash => ".bashrc",
            ShellType::Zsh => ".zshrc",
            ShellType::Fish => ".config/fish/config.fish",
            ShellType::PowerShell | ShellType::Cmd | ShellType::Unknown => ".profile",
        }
    }

    /// Whether the profile uses fish syntax instead of POSIX `export`.
    pub fn is_fish(&self) -> bool {
        matches!(self, ShellType::Fish)
    }
}

/// Detect the user's login shell from `SHELL` (or `COMSPEC` on Windows).
pub fn detect_shell() -> ShellType {
    ShellType::from_executable(&shell_executable().to_string_lossy())
}

fn shell_executable() -> PathBuf {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
    } else {
        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}

/// Check if running in a CI environment.
///
/// Used to force the plain, non-interactive UI in `main()`. Checks common
/// CI environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`,
/// `CIRCLECI`, `TRAVIS`, `JENKINS_URL`, `TF_BUILD`.
pub fn is_ci() -> bool {
    [
        "CI",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "CIRCLECI",
        "TRAVIS",
        "JENKINS_URL",
        "TF_BUILD",
    ]
    .iter()
    .any(|var| std::env::var(var).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_type_from_executable() {
        assert_eq!(ShellType::from_executable("/bin/bash"), ShellType::Bash);
        assert_eq!(ShellType::from_executable("/usr/bin/zsh"), ShellType::Zsh);
        assert_eq!(ShellType::from_executable("/usr/bin/fish"), ShellType::Fish);
        assert_eq!(ShellType::from_executable("pwsh"), ShellType::PowerShell);
        assert_eq!(ShellType::from_executable("cmd.exe"), ShellType::Cmd);
        assert_eq!(ShellType::from_executable("/bin/dash"), ShellType::Unknown);
    }

    #[test]
    fn profile_files_per_shell() {
        assert_eq!(ShellType::Bash.profile_file(), ".bashrc");
        assert_eq!(ShellType::Zsh.profile_file(), ".zshrc");
        assert!(ShellType::Fish.profile_file().ends_with("config.fish"));
        assert_eq!(ShellType::Unknown.profile_file(), ".profile");
    }

    #[test]
    fn only_fish_uses_fish_syntax() {
        assert!(ShellType::Fish.is_fish());
        assert!(!ShellType::Bash.is_fish());
        assert!(!ShellType::Zsh.is_fish());
    }

    #[test]
    fn is_ci_does_not_panic() {
        let _ = is_ci();
    }
}
