//! Vendored binary shipped inside the project.

use std::path::PathBuf;

use crate::detection::dir_contains_binary;
use crate::search_path::ensure_on_path;

use super::strategy::{InstallContext, InstallOutcome, InstallStrategy, StrategyKind};

/// Use a copy of the binary already sitting in the project tree.
#[derive(Debug, Clone)]
pub struct BundledStrategy {
    binary: String,
    dir: PathBuf,
}

impl BundledStrategy {
    /// Strategy for `binary` inside `dir`.
    pub fn new(binary: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            dir: dir.into(),
        }
    }
}

impl InstallStrategy for BundledStrategy {
    fn name(&self) -> &str {
        "bundled"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Bundled
    }

    fn is_applicable(&self, _ctx: &InstallContext<'_>) -> bool {
        dir_contains_binary(&self.dir, &self.binary)
    }

    fn apply(&self, ctx: &mut InstallContext<'_>) -> InstallOutcome {
        let dir = self.dir.to_string_lossy();
        ensure_on_path(&dir, None, ctx.env);
        ctx.ui
            .success(&format!("Using bundled {} from {}", self.binary, dir));
        InstallOutcome::Installed {
            strategy: self.name().to_string(),
            already_registered: false,
        }
    }
}
