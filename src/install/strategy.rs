//! The installation strategy seam.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::environment::Environment;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Mockable dependencies for installation.
pub struct InstallContext<'a> {
    /// Session environment; the bundled strategy extends its search path.
    pub env: &'a mut dyn Environment,
    /// Runs package-manager commands.
    pub runner: &'a dyn CommandRunner,
    /// Progress and guidance output.
    pub ui: &'a mut dyn UserInterface,
    /// Bound on each external command.
    pub timeout: Option<Duration>,
}

/// Which family a strategy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A vendored copy inside the project.
    Bundled,
    /// An OS package manager.
    PackageManager,
    /// Instructions for the user; nothing automated.
    Manual,
}

/// Result of the installer orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InstallOutcome {
    /// The tool already resolved; no strategy ran.
    Skipped,
    /// A strategy completed.
    Installed {
        /// Strategy name.
        strategy: String,
        /// The package manager reported the package as already present.
        already_registered: bool,
    },
    /// The chosen strategy failed.
    Failed {
        /// Strategy name.
        strategy: String,
        /// What went wrong.
        reason: String,
    },
    /// No automated strategy applied.
    Unavailable {
        /// Instructions shown to the user.
        guidance: Vec<String>,
    },
}

impl InstallOutcome {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Installed { .. } => "installed",
            Self::Failed { .. } => "failed",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// One way of getting the tool onto the machine.
pub trait InstallStrategy: fmt::Debug {
    /// Name shown in messages (`bundled`, `winget`, `manual`).
    fn name(&self) -> &str;

    /// Strategy family.
    fn kind(&self) -> StrategyKind;

    /// Whether this strategy's precondition holds right now.
    fn is_applicable(&self, ctx: &InstallContext<'_>) -> bool;

    /// Perform the installation. Failures are returned, never raised.
    fn apply(&self, ctx: &mut InstallContext<'_>) -> InstallOutcome;
}
