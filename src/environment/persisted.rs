//! Persisted user environment.
//!
//! The session environment disappears with the process. With `--persist`,
//! search-path additions and the data-directory pointer are also written to
//! a store that future shells read:
//!
//! - [`WindowsUserStore`]: the user-scope environment (`HKCU\Environment`),
//!   read and written through PowerShell's `[Environment]` API.
//! - [`ShellProfileStore`]: lines tagged `# tessup` in the user's shell
//!   profile on Unix-like systems.
//! - [`MemoryStore`]: in-memory, for tests.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TessupError};
use crate::shell::{detect_shell, CommandRunner, Invocation, ShellType};

use super::handle::PathSyntax;

/// Marker appended to every profile line tessup writes.
pub const PROFILE_MARKER: &str = "# tessup";

/// A durable user-level environment.
pub trait PersistedEnvironment {
    /// Short description for messages (e.g. `~/.zshrc`).
    fn describe(&self) -> String;

    /// Path syntax of the persisted search-path list.
    fn path_syntax(&self) -> PathSyntax;

    /// Entries of the persisted search path.
    fn search_path(&self) -> Result<Vec<String>>;

    /// Append one directory to the persisted search path.
    ///
    /// Callers check membership first; this always appends.
    fn append_search_path(&mut self, dir: &str) -> Result<()>;

    /// Read a persisted variable.
    fn var(&self, key: &str) -> Result<Option<String>>;

    /// Persist a variable.
    fn set_var(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Pick the store for this platform.
pub fn default_store<'a>(
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
) -> Result<Box<dyn PersistedEnvironment + 'a>> {
    if cfg!(windows) {
        Ok(Box::new(WindowsUserStore::new(runner, timeout)))
    } else {
        Ok(Box::new(ShellProfileStore::detect()?))
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<String>,
    vars: HashMap<String, String>,
    syntax: PathSyntax,
    writes: usize,
}

impl MemoryStore {
    /// Empty store with native syntax.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with search-path entries.
    pub fn with_entries<S: Into<String>>(entries: impl IntoIterator<Item = S>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Empty store using `syntax` for its search path.
    pub fn with_syntax(syntax: PathSyntax) -> Self {
        Self {
            syntax,
            ..Self::default()
        }
    }

    /// Number of write operations performed.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Current entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl PersistedEnvironment for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn path_syntax(&self) -> PathSyntax {
        self.syntax
    }

    fn search_path(&self) -> Result<Vec<String>> {
        Ok(self.entries.clone())
    }

    fn append_search_path(&mut self, dir: &str) -> Result<()> {
        self.entries.push(dir.to_string());
        self.writes += 1;
        Ok(())
    }

    fn var(&self, key: &str) -> Result<Option<String>> {
        Ok(self.vars.get(key).cloned())
    }

    fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        self.vars.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// User-scope environment on Windows, via PowerShell.
pub struct WindowsUserStore<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
}

impl<'a> WindowsUserStore<'a> {
    /// Create a store that shells out through `runner`.
    pub fn new(runner: &'a dyn CommandRunner, timeout: Option<Duration>) -> Self {
        Self { runner, timeout }
    }

    fn powershell(&self, script: String) -> Result<String> {
        let invocation = Invocation::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(script)
            .timeout(self.timeout);
        let result = self.runner.run(&invocation)?;
        if !result.success {
            return Err(TessupError::PersistFailed {
                store: self.describe(),
                message: result
                    .last_output_line()
                    .unwrap_or("powershell exited unsuccessfully")
                    .to_string(),
            });
        }
        Ok(result.stdout.trim().to_string())
    }

    fn read_raw(&self, key: &str) -> Result<String> {
        self.powershell(format!(
            "[Environment]::GetEnvironmentVariable('{}', 'User')",
            ps_quote(key)
        ))
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        self.powershell(format!(
            "[Environment]::SetEnvironmentVariable('{}', '{}', 'User')",
            ps_quote(key),
            ps_quote(value)
        ))
        .map(|_| ())
    }
}

/// Escape a value for a single-quoted PowerShell string.
fn ps_quote(value: &str) -> String {
    value.replace('\'', "''")
}

impl PersistedEnvironment for WindowsUserStore<'_> {
    fn describe(&self) -> String {
        "user environment".to_string()
    }

    fn path_syntax(&self) -> PathSyntax {
        PathSyntax::WINDOWS
    }

    fn search_path(&self) -> Result<Vec<String>> {
        Ok(PathSyntax::WINDOWS.split(&self.read_raw("Path")?))
    }

    fn append_search_path(&mut self, dir: &str) -> Result<()> {
        let current = self.read_raw("Path")?;
        let current = current.trim_end_matches(';');
        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{};{}", current, dir)
        };
        self.write_raw("Path", &updated)
    }

    fn var(&self, key: &str) -> Result<Option<String>> {
        let value = self.read_raw(key)?;
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        self.write_raw(key, value)
    }
}

/// Tagged lines in a shell profile.
///
/// Only lines ending in [`PROFILE_MARKER`] are read or rewritten; the rest of
/// the file is left alone.
#[derive(Debug, Clone)]
pub struct ShellProfileStore {
    profile: PathBuf,
    fish: bool,
}

impl ShellProfileStore {
    /// Store writing POSIX `export` lines to `profile`.
    pub fn posix(profile: impl Into<PathBuf>) -> Self {
        Self {
            profile: profile.into(),
            fish: false,
        }
    }

    /// Store writing fish `set -gx` lines to `profile`.
    pub fn fish(profile: impl Into<PathBuf>) -> Self {
        Self {
            profile: profile.into(),
            fish: true,
        }
    }

    /// Profile of the user's login shell.
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| TessupError::PersistFailed {
            store: "shell profile".to_string(),
            message: "home directory could not be determined".to_string(),
        })?;
        Ok(Self::for_shell(&home, detect_shell()))
    }

    /// Profile of `shell` under `home`.
    pub fn for_shell(home: &Path, shell: ShellType) -> Self {
        let profile = home.join(shell.profile_file());
        if shell.is_fish() {
            Self::fish(profile)
        } else {
            Self::posix(profile)
        }
    }

    /// Path of the profile file.
    pub fn profile(&self) -> &Path {
        &self.profile
    }

    fn path_line(&self, dir: &str) -> String {
        if self.fish {
            format!("set -gx PATH $PATH \"{}\" {}", dir, PROFILE_MARKER)
        } else {
            format!("export PATH=\"$PATH:{}\" {}", dir, PROFILE_MARKER)
        }
    }

    fn var_line(&self, key: &str, value: &str) -> String {
        if self.fish {
            format!("set -gx {} \"{}\" {}", key, value, PROFILE_MARKER)
        } else {
            format!("export {}=\"{}\" {}", key, value, PROFILE_MARKER)
        }
    }

    fn parse_path_line(&self, body: &str) -> Option<String> {
        let inner = if self.fish {
            body.strip_prefix("set -gx PATH $PATH \"")?
        } else {
            body.strip_prefix("export PATH=\"$PATH:")?
        };
        inner.strip_suffix('"').map(String::from)
    }

    fn parse_var_line(&self, key: &str, body: &str) -> Option<String> {
        let prefix = if self.fish {
            format!("set -gx {} \"", key)
        } else {
            format!("export {}=\"", key)
        };
        body.strip_prefix(&prefix)?
            .strip_suffix('"')
            .map(String::from)
    }

    /// Bodies of all tagged lines, marker removed.
    fn tagged_lines(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.profile) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(content
            .lines()
            .filter_map(|line| line.trim_end().strip_suffix(PROFILE_MARKER))
            .map(|body| body.trim_end().to_string())
            .collect())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.profile.parent() {
            fs::create_dir_all(parent)?;
        }
        let needs_newline = fs::read(&self.profile)
            .map(|bytes| !bytes.is_empty() && !bytes.ends_with(b"\n"))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.profile)?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn check_value(&self, value: &str) -> Result<()> {
        if value.contains('"') || value.contains('\n') {
            return Err(TessupError::PersistFailed {
                store: self.describe(),
                message: format!("cannot write value containing quotes or newlines: {}", value),
            });
        }
        Ok(())
    }
}

impl PersistedEnvironment for ShellProfileStore {
    fn describe(&self) -> String {
        self.profile.display().to_string()
    }

    fn path_syntax(&self) -> PathSyntax {
        PathSyntax::UNIX
    }

    fn search_path(&self) -> Result<Vec<String>> {
        Ok(self
            .tagged_lines()?
            .iter()
            .filter_map(|body| self.parse_path_line(body))
            .collect())
    }

    fn append_search_path(&mut self, dir: &str) -> Result<()> {
        self.check_value(dir)?;
        self.append_line(&self.path_line(dir))
    }

    fn var(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .tagged_lines()?
            .iter()
            .rev()
            .find_map(|body| self.parse_var_line(key, body)))
    }

    fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_value(value)?;
        if self.var(key)?.as_deref() == Some(value) {
            return Ok(());
        }

        // Replace our own earlier assignment rather than stacking them.
        let content = match fs::read_to_string(&self.profile) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| {
                line.trim_end()
                    .strip_suffix(PROFILE_MARKER)
                    .map(|body| self.parse_var_line(key, body.trim_end()).is_none())
                    .unwrap_or(true)
            })
            .collect();
        if kept.len() != content.lines().count() {
            let mut rewritten = kept.join("\n");
            if !rewritten.is_empty() {
                rewritten.push('\n');
            }
            fs::write(&self.profile, rewritten)?;
        }
        self.append_line(&self.var_line(key, value))
    }
}
