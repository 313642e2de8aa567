//! The provisioning pipeline.
//!
//! One linear pass per run: detect, install, configure the search path,
//! fetch assets, validate. Stages never abort the run; every failure is
//! recorded and the validator has the final word.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets::{
    ensure_assets, point_data_dir, resolve_fetcher, AssetOutcome, AssetRequirement, DataDirUpdate,
    Fetcher,
};
use crate::config::TessupConfig;
use crate::detection::{directories_containing, probe_version, resolve};
use crate::environment::{Environment, PersistedEnvironment};
use crate::install::{absolutize, install, InstallContext, InstallOutcome, ToolDescriptor};
use crate::report::{report, validate, ProvisioningResult};
use crate::search_path::{ensure_on_path, PathUpdate, PersistOutcome};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Everything one run did, stage by stage.
#[derive(Debug)]
pub struct RunReport {
    /// Where the tool resolved before anything was changed.
    pub detected: Option<PathBuf>,
    /// Version reported by the tool, if it could be probed.
    pub version: Option<String>,
    /// Installer outcome.
    pub install: InstallOutcome,
    /// One entry per directory known to hold the tool.
    pub path_updates: Vec<PathUpdate>,
    /// Per-asset outcomes in configuration order.
    pub assets: Vec<(String, AssetOutcome)>,
    /// Data-directory pointer changes.
    pub data_dir: DataDirUpdate,
    /// Final classification.
    pub result: ProvisioningResult,
}

impl RunReport {
    /// Process exit code for this run.
    pub fn exit_code(&self) -> u8 {
        self.result.exit_code()
    }
}

/// Fetcher used when no real one could be built.
struct UnavailableFetcher {
    reason: String,
}

impl Fetcher for UnavailableFetcher {
    fn describe(&self) -> String {
        "unavailable".to_string()
    }

    fn fetch(&self, _requirement: &AssetRequirement) -> anyhow::Result<()> {
        anyhow::bail!("{}", self.reason)
    }
}

/// Runs the pipeline for one project.
pub struct Provisioner<'a> {
    descriptor: ToolDescriptor,
    requirements: Vec<AssetRequirement>,
    data_dir: PathBuf,
    data_dir_var: String,
    fetch_script: Option<PathBuf>,
    project_root: PathBuf,
    runner: &'a dyn CommandRunner,
    timeout: Option<Duration>,
}

impl<'a> Provisioner<'a> {
    /// Build from a loaded configuration.
    pub fn new(
        config: &TessupConfig,
        project_root: &Path,
        runner: &'a dyn CommandRunner,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            descriptor: ToolDescriptor::from_config(&config.tool, project_root),
            requirements: AssetRequirement::from_config(&config.assets, project_root),
            data_dir: absolutize(&config.assets.dir, project_root),
            data_dir_var: config.assets.env_var.clone(),
            fetch_script: config.assets.fetch_script.clone(),
            project_root: project_root.to_path_buf(),
            runner,
            timeout,
        }
    }

    /// The target tool.
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// The required assets.
    pub fn requirements(&self) -> &[AssetRequirement] {
        &self.requirements
    }

    /// Classify the current state without changing anything.
    pub fn check(&self, env: &dyn Environment) -> ProvisioningResult {
        validate(&self.descriptor, &self.requirements, env)
    }

    /// Run every stage with the fetcher chosen for this project.
    pub fn run(
        &self,
        env: &mut dyn Environment,
        store: Option<&mut dyn PersistedEnvironment>,
        ui: &mut dyn UserInterface,
    ) -> RunReport {
        let fetcher: Box<dyn Fetcher + '_> = match resolve_fetcher(
            &self.project_root,
            self.fetch_script.as_deref(),
            self.runner,
            self.timeout,
        ) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                tracing::warn!("No fetcher available: {:#}", e);
                Box::new(UnavailableFetcher {
                    reason: format!("{:#}", e),
                })
            }
        };
        tracing::debug!("Fetching with {}", fetcher.describe());
        self.run_with_fetcher(env, store, ui, fetcher.as_ref())
    }

    /// Run every stage with an explicit fetcher.
    pub fn run_with_fetcher(
        &self,
        env: &mut dyn Environment,
        mut store: Option<&mut dyn PersistedEnvironment>,
        ui: &mut dyn UserInterface,
        fetcher: &dyn Fetcher,
    ) -> RunReport {
        let binary = self.descriptor.binary.clone();
        ui.show_header(&format!("Provisioning {}", binary));

        // Detect
        let detected = resolve(&binary, env);
        let version = detected.as_deref().and_then(|path| {
            probe_version(path, &self.descriptor.probe_args, self.runner, self.timeout)
        });
        match (&detected, &version) {
            (Some(path), Some(v)) => {
                ui.success(&format!("Found {} {} at {}", binary, v, path.display()))
            }
            (Some(path), None) => ui.success(&format!("Found {} at {}", binary, path.display())),
            (None, _) => ui.message(&format!("{} not found on PATH", binary)),
        }

        // Install
        let install_outcome = {
            let mut ctx = InstallContext {
                env: &mut *env,
                runner: self.runner,
                ui: &mut *ui,
                timeout: self.timeout,
            };
            install(&self.descriptor, &mut ctx)
        };
        tracing::debug!("Install outcome: {}", install_outcome.label());
        if let InstallOutcome::Failed { strategy, reason } = &install_outcome {
            ui.warning(&format!("Install via {} failed: {}", strategy, reason));
        }

        // Search path
        let dirs = directories_containing(&self.descriptor.known_dirs(), &binary);
        let mut path_updates = Vec::with_capacity(dirs.len());
        for dir in &dirs {
            let dir = dir.to_string_lossy();
            let persisted = store
                .as_mut()
                .map(|s| &mut **s as &mut dyn PersistedEnvironment);
            let update = ensure_on_path(&dir, persisted, env);
            if update.session_added && ui.output_mode().shows_detail() {
                ui.success(&format!("Added {} to PATH", dir));
            }
            if let PersistOutcome::Failed(reason) = &update.persisted {
                ui.warning(&format!("Could not persist {} to PATH: {}", dir, reason));
            }
            path_updates.push(update);
        }

        // Assets
        let assets = ensure_assets(&self.requirements, fetcher, ui);
        let data_dir = point_data_dir(&self.data_dir_var, &self.data_dir, env, store);
        if data_dir.session_set && ui.output_mode().shows_detail() {
            ui.success(&format!(
                "Set {} to {}",
                self.data_dir_var,
                self.data_dir.display()
            ));
        }
        if let Some(reason) = &data_dir.persist_error {
            ui.warning(&format!("Could not persist {}: {}", self.data_dir_var, reason));
        }

        // Validate
        let result = validate(&self.descriptor, &self.requirements, env);
        report(&result, &binary, ui);

        RunReport {
            detected,
            version,
            install: install_outcome,
            path_updates,
            assets,
            data_dir,
            result,
        }
    }
}
