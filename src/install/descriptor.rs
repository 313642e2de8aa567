//! What to provision and how.

use std::path::{Path, PathBuf};

use crate::config::ToolConfig;

use super::bundled::BundledStrategy;
use super::manual::ManualStrategy;
use super::package_manager::{PackageManagerSpec, PackageManagerStrategy};
use super::strategy::InstallStrategy;

/// The target tool. Built once at startup, never mutated.
#[derive(Debug)]
pub struct ToolDescriptor {
    /// Binary name without platform suffix.
    pub binary: String,
    /// Arguments for the version probe.
    pub probe_args: Vec<String>,
    /// Directories where the binary usually lands.
    pub candidate_dirs: Vec<PathBuf>,
    /// Vendored copy location.
    pub bundled_dir: PathBuf,
    /// Package managers in priority order.
    pub package_managers: Vec<PackageManagerSpec>,
    /// Bundled, then each package manager, then manual.
    pub strategies: Vec<Box<dyn InstallStrategy>>,
}

impl ToolDescriptor {
    /// Build from configuration; relative paths are taken from `project_root`.
    pub fn from_config(config: &ToolConfig, project_root: &Path) -> Self {
        let bundled_dir = absolutize(&config.bundled_dir, project_root);
        let package_managers: Vec<PackageManagerSpec> = config
            .package_managers
            .iter()
            .map(PackageManagerSpec::from)
            .collect();

        let mut strategies: Vec<Box<dyn InstallStrategy>> = Vec::new();
        strategies.push(Box::new(BundledStrategy::new(
            config.binary.clone(),
            bundled_dir.clone(),
        )));
        for spec in &package_managers {
            strategies.push(Box::new(PackageManagerStrategy::new(spec.clone())));
        }
        strategies.push(Box::new(ManualStrategy::for_platform(
            &config.binary,
            &bundled_dir,
        )));

        Self {
            binary: config.binary.clone(),
            probe_args: config.probe_args.clone(),
            candidate_dirs: config.candidate_dirs.clone(),
            bundled_dir,
            package_managers,
            strategies,
        }
    }

    /// Every directory that may hold the binary, deduplicated, in order:
    /// bundled, candidates, then package-manager install dirs.
    pub fn known_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.bundled_dir.clone()];
        dirs.extend(self.candidate_dirs.iter().cloned());
        for pm in &self.package_managers {
            dirs.extend(pm.install_dirs.iter().cloned());
        }
        let mut unique: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        unique
    }
}

/// Join `path` onto `root` unless it is already absolute.
pub fn absolutize(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
