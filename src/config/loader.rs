//! Configuration file discovery and loading.

use crate::config::schema::TessupConfig;
use crate::error::{Result, TessupError};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = ".tessup.yml";

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. a `.tessup.yml` file (primary indicator)
/// 2. a `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file and parse it.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<TessupConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TessupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TessupError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content.
///
/// An empty document is the default configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<TessupConfig> {
    if content.trim().is_empty() {
        return Ok(TessupConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| TessupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, `<project>/.tessup.yml` is
/// used when present and the built-in defaults otherwise.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<TessupConfig> {
    if let Some(path) = config_override {
        tracing::debug!("Loading config from {}", path.display());
        return load_config_file(path);
    }

    let path = project_root.join(CONFIG_FILE);
    if path.is_file() {
        tracing::debug!("Loading config from {}", path.display());
        load_config_file(&path)
    } else {
        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(TessupConfig::default())
    }
}
