//! Session environment handle.
//!
//! Stages never touch `std::env` directly. They read and write the session's
//! environment values through an [`Environment`] passed by reference, so tests
//! can run the whole pipeline against an isolated [`MemoryEnvironment`].

use std::collections::HashMap;

/// Name of the executable search-path variable.
pub const PATH_VAR: &str = "PATH";

/// How search-path values are split and how directory entries compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSyntax {
    separator: char,
    case_insensitive: bool,
}

impl PathSyntax {
    /// `:`-separated, case-sensitive.
    pub const UNIX: PathSyntax = PathSyntax {
        separator: ':',
        case_insensitive: false,
    };

    /// `;`-separated, case-insensitive, `\` and `/` both separators.
    pub const WINDOWS: PathSyntax = PathSyntax {
        separator: ';',
        case_insensitive: true,
    };

    /// Syntax of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::WINDOWS
        } else {
            Self::UNIX
        }
    }

    /// List separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Split a search-path value into its non-empty entries, in order.
    pub fn split(&self, value: &str) -> Vec<String> {
        value
            .split(self.separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Comparison key for a directory entry.
    ///
    /// Trailing directory separators are dropped (a bare root keeps its
    /// separator) and, on Windows, case is folded and `/` is treated as `\`.
    pub fn normalize(&self, dir: &str) -> String {
        let dir = dir.trim();
        let dir = if self.case_insensitive {
            dir.replace('/', "\\").to_lowercase()
        } else {
            dir.to_string()
        };
        let dir_sep = if self.case_insensitive { '\\' } else { '/' };
        let trimmed = dir.trim_end_matches(dir_sep);
        if trimmed.is_empty() && !dir.is_empty() {
            dir_sep.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Whether two directory entries name the same directory.
    pub fn same_dir(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

impl Default for PathSyntax {
    fn default() -> Self {
        Self::native()
    }
}

/// Access to the session's environment values.
pub trait Environment {
    /// Read a variable.
    fn var(&self, key: &str) -> Option<String>;

    /// Set a variable for the rest of the session.
    fn set_var(&mut self, key: &str, value: &str);

    /// How this environment's search path is written.
    fn path_syntax(&self) -> PathSyntax;

    /// Current search-path value (empty if unset).
    fn search_path(&self) -> String {
        self.var(PATH_VAR).unwrap_or_default()
    }

    /// Replace the search-path value.
    fn set_search_path(&mut self, value: &str) {
        self.set_var(PATH_VAR, value);
    }
}

/// The real process environment.
///
/// Writes are visible to child processes started afterwards, which is how
/// the application launched after provisioning inherits them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Handle onto `std::env`.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        // Provisioning is single-threaded; nothing else reads the
        // environment concurrently.
        std::env::set_var(key, value);
    }

    fn path_syntax(&self) -> PathSyntax {
        PathSyntax::native()
    }
}

/// An isolated environment held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    vars: HashMap<String, String>,
    syntax: PathSyntax,
}

impl MemoryEnvironment {
    /// Empty environment with native path syntax.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty environment with the given path syntax.
    pub fn with_syntax(syntax: PathSyntax) -> Self {
        Self {
            vars: HashMap::new(),
            syntax,
        }
    }

    /// Builder-style variable setter.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// All variables.
    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }
}

impl Environment for MemoryEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn path_syntax(&self) -> PathSyntax {
        self.syntax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_split_drops_empty_entries() {
        let parts = PathSyntax::UNIX.split("/usr/bin::/bin:");
        assert_eq!(parts, vec!["/usr/bin", "/bin"]);
    }

    #[test]
    fn windows_split_uses_semicolon() {
        let parts = PathSyntax::WINDOWS.split(r"C:\Windows;C:\Program Files\Tesseract-OCR;");
        assert_eq!(parts, vec![r"C:\Windows", r"C:\Program Files\Tesseract-OCR"]);
    }

    #[test]
    fn unix_normalize_strips_trailing_slash_keeps_case() {
        let syntax = PathSyntax::UNIX;
        assert_eq!(syntax.normalize("/opt/Tess/"), "/opt/Tess");
        assert_eq!(syntax.normalize("/"), "/");
        assert!(!syntax.same_dir("/opt/tess", "/opt/Tess"));
        assert!(syntax.same_dir("/opt/tess//", "/opt/tess"));
    }

    #[test]
    fn windows_normalize_folds_case_and_slashes() {
        let syntax = PathSyntax::WINDOWS;
        assert!(syntax.same_dir(
            r"C:\Program Files\Tesseract-OCR\",
            "c:/program files/tesseract-ocr"
        ));
        assert_eq!(syntax.normalize(r"\"), r"\");
    }

    #[test]
    fn memory_environment_reads_back_writes() {
        let mut env = MemoryEnvironment::with_syntax(PathSyntax::UNIX).with_var(PATH_VAR, "/bin");
        assert_eq!(env.search_path(), "/bin");
        env.set_search_path("/bin:/usr/bin");
        assert_eq!(env.var(PATH_VAR).as_deref(), Some("/bin:/usr/bin"));
        assert_eq!(env.path_syntax(), PathSyntax::UNIX);
    }

    #[test]
    fn missing_path_reads_as_empty() {
        let env = MemoryEnvironment::new();
        assert_eq!(env.search_path(), "");
    }
}
