//! The fetch hook.
//!
//! A single [`Fetcher`] is chosen at startup and used for every missing
//! asset: a project-supplied fetch script when one exists, the built-in
//! HTTPS download otherwise.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::install::absolutize;
use crate::shell::CommandRunner;

use super::http::HttpFetcher;
use super::requirement::AssetRequirement;
use super::script::ScriptFetcher;

/// Something that can put one asset at its destination.
pub trait Fetcher {
    /// Short description for messages.
    fn describe(&self) -> String;

    /// Fetch `requirement` to [`AssetRequirement::destination`].
    ///
    /// On error no file may be left under the destination name.
    fn fetch(&self, requirement: &AssetRequirement) -> Result<()>;
}

/// Default location of the fetch script for this platform.
pub fn default_script_path(project_root: &Path) -> PathBuf {
    let name = if cfg!(windows) {
        "fetch_tessdata.ps1"
    } else {
        "fetch_tessdata.sh"
    };
    project_root.join("scripts").join(name)
}

/// Pick the fetcher for this run.
///
/// A configured script wins, then the default script location, then the
/// built-in HTTP download. A configured script that does not exist is
/// ignored with a warning in the log.
pub fn resolve_fetcher<'a>(
    project_root: &Path,
    configured_script: Option<&Path>,
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
) -> Result<Box<dyn Fetcher + 'a>> {
    if let Some(script) = configured_script {
        let script = absolutize(script, project_root);
        if script.is_file() {
            tracing::debug!("Using configured fetch script {}", script.display());
            return Ok(Box::new(ScriptFetcher::new(script, runner, timeout)));
        }
        tracing::warn!(
            "Configured fetch script {} does not exist, ignoring it",
            script.display()
        );
    }

    let default = default_script_path(project_root);
    if default.is_file() {
        tracing::debug!("Using fetch script {}", default.display());
        return Ok(Box::new(ScriptFetcher::new(default, runner, timeout)));
    }

    tracing::debug!("Using built-in HTTPS fetch");
    Ok(Box::new(HttpFetcher::new(timeout)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_script_means_http() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let fetcher = resolve_fetcher(temp.path(), None, &runner, None).unwrap();
        assert!(fetcher.describe().starts_with("https"));
    }

    #[test]
    fn default_script_is_picked_up() {
        let temp = TempDir::new().unwrap();
        let script = default_script_path(temp.path());
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, "").unwrap();
        let runner = MockRunner::new();

        let fetcher = resolve_fetcher(temp.path(), None, &runner, None).unwrap();
        assert!(fetcher.describe().contains("fetch_tessdata"));
    }

    #[test]
    fn configured_script_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("get.sh"), "").unwrap();
        let script = default_script_path(temp.path());
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, "").unwrap();
        let runner = MockRunner::new();

        let fetcher =
            resolve_fetcher(temp.path(), Some(Path::new("get.sh")), &runner, None).unwrap();
        assert!(fetcher.describe().contains("get.sh"));
    }

    #[test]
    fn missing_configured_script_falls_back() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let fetcher =
            resolve_fetcher(temp.path(), Some(Path::new("nope.sh")), &runner, None).unwrap();
        assert!(fetcher.describe().starts_with("https"));
    }
}
