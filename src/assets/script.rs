//! Project-supplied fetch script.

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shell::{CommandRunner, Invocation};

use super::checksum;
use super::fetcher::Fetcher;
use super::requirement::AssetRequirement;

/// Delegates every fetch to an external script.
///
/// The script is called as `<script> <url> <destination>` with
/// `TESSUP_ASSET_NAME`, `TESSUP_ASSET_URL` and `TESSUP_ASSET_DEST` set. It
/// succeeds only if it exits 0 and the destination exists afterwards.
pub struct ScriptFetcher<'a> {
    script: PathBuf,
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
}

impl<'a> ScriptFetcher<'a> {
    /// Fetcher running `script` through `runner`.
    pub fn new(script: PathBuf, runner: &'a dyn CommandRunner, timeout: Option<Duration>) -> Self {
        Self {
            script,
            runner,
            timeout,
        }
    }

    fn invocation(&self, url: &str, dest: &Path) -> Invocation {
        let ext = self
            .script
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let base = match ext.as_str() {
            "ps1" => Invocation::new("powershell").args([
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
                self.script.to_string_lossy().into_owned(),
            ]),
            "sh" => Invocation::new("sh").arg(self.script.to_string_lossy()),
            _ => Invocation::new(&self.script),
        };
        base.arg(url)
            .arg(dest.to_string_lossy())
            .timeout(self.timeout)
    }
}

impl Fetcher for ScriptFetcher<'_> {
    fn describe(&self) -> String {
        format!("script {}", self.script.display())
    }

    fn fetch(&self, requirement: &AssetRequirement) -> Result<()> {
        let dest = requirement.destination();
        let invocation = self
            .invocation(&requirement.url, &dest)
            .env("TESSUP_ASSET_NAME", requirement.filename.as_str())
            .env("TESSUP_ASSET_URL", requirement.url.as_str())
            .env("TESSUP_ASSET_DEST", dest.to_string_lossy())
            .cwd(&requirement.dest_dir);

        let result = match self.runner.run(&invocation) {
            Ok(result) => result,
            Err(e) => {
                discard(&dest);
                return Err(e.into());
            }
        };
        if !result.success {
            discard(&dest);
            let detail = result.last_output_line().unwrap_or("no output");
            bail!(
                "fetch script exited with {}: {}",
                result
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                detail
            );
        }
        if !dest.is_file() {
            bail!(
                "fetch script succeeded but {} was not created",
                dest.display()
            );
        }
        if let Err(e) = checksum::verify(&dest, &requirement.filename, requirement.sha256.as_deref())
        {
            discard(&dest);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Drop whatever a failed script left under the destination name.
fn discard(dest: &Path) {
    if dest.exists() {
        if let Err(e) = fs::remove_file(dest) {
            tracing::warn!("Could not remove partial {}: {}", dest.display(), e);
        }
    }
}
