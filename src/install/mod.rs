//! Installer orchestration.
//!
//! Strategies are tried in priority order and the first one whose
//! precondition holds decides the outcome:
//!
//! 1. [`BundledStrategy`]: a copy vendored in the project tree
//! 2. [`PackageManagerStrategy`]: each configured OS package manager
//! 3. [`ManualStrategy`]: guidance only
//!
//! Nothing here returns an error. Every failure becomes an
//! [`InstallOutcome`] so the pipeline can carry on.

pub mod bundled;
pub mod descriptor;
pub mod manual;
pub mod orchestrator;
pub mod package_manager;
pub mod strategy;

pub use bundled::BundledStrategy;
pub use descriptor::{absolutize, ToolDescriptor};
pub use manual::ManualStrategy;
pub use orchestrator::install;
pub use package_manager::{PackageManagerSpec, PackageManagerStrategy};
pub use strategy::{InstallContext, InstallOutcome, InstallStrategy, StrategyKind};
