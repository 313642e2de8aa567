//! Binary lookup against a session search path.

use std::path::{Path, PathBuf};

use crate::environment::Environment;

/// File name of `binary` on this platform (`tesseract.exe` on Windows).
pub fn binary_file_name(binary: &str) -> String {
    format!("{}{}", binary, std::env::consts::EXE_SUFFIX)
}

/// Resolve `binary` against the environment's search path.
///
/// This is a filesystem lookup only; nothing is executed. Lookup follows the
/// platform's rules (executable bit on Unix, `PATHEXT` on Windows).
pub fn resolve(binary: &str, env: &dyn Environment) -> Option<PathBuf> {
    let search_path = env.search_path();
    if search_path.is_empty() {
        return None;
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match which::which_in(binary, Some(search_path), cwd) {
        Ok(path) => {
            tracing::debug!("Resolved {} to {}", binary, path.display());
            Some(path)
        }
        Err(_) => {
            tracing::debug!("{} is not on the search path", binary);
            None
        }
    }
}

/// Whether `binary` resolves on the environment's search path.
pub fn is_resolvable(binary: &str, env: &dyn Environment) -> bool {
    resolve(binary, env).is_some()
}

/// Whether `dir` holds a file named like `binary`.
pub fn dir_contains_binary(dir: &Path, binary: &str) -> bool {
    dir.join(binary_file_name(binary)).is_file()
}

/// The subset of `dirs` that actually contain `binary`, first occurrence
/// kept, order preserved.
pub fn directories_containing<'a, I>(dirs: I, binary: &str) -> Vec<PathBuf>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut found: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        if dir_contains_binary(dir, binary) && !found.contains(dir) {
            found.push(dir.clone());
        }
    }
    found
}
