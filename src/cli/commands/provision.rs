//! Provision command implementation.
//!
//! The `tessup provision` command runs the whole pipeline. It is also what
//! runs when no subcommand is given.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::ProvisionArgs;
use crate::config::TessupConfig;
use crate::environment::{default_store, PersistedEnvironment, ProcessEnvironment};
use crate::error::Result;
use crate::pipeline::{Provisioner, RunReport};
use crate::search_path::PersistOutcome;
use crate::shell::SystemRunner;
use crate::ui::UserInterface;

use super::dispatcher::{load_validated, Command, CommandResult};

/// The provision command implementation.
pub struct ProvisionCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ProvisionArgs,
}

impl ProvisionCommand {
    /// Create a new provision command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ProvisionArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Effective timeout: the flag wins over the config file.
    fn timeout(&self, config: &TessupConfig) -> Option<Duration> {
        self.args
            .timeout
            .or(config.settings.timeout_secs)
            .map(Duration::from_secs)
    }

    fn persist(&self, config: &TessupConfig) -> bool {
        self.args.persist || config.settings.persist
    }
}

fn persisted_anything(run: &RunReport) -> bool {
    run.data_dir.persisted_set
        || run
            .path_updates
            .iter()
            .any(|u| u.persisted == PersistOutcome::Added)
}

impl Command for ProvisionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_validated(&self.project_root, self.config_path.as_deref())?;
        let timeout = self.timeout(&config);
        let runner = SystemRunner::new();
        let mut env = ProcessEnvironment::new();

        let mut store = if self.persist(&config) {
            match default_store(&runner, timeout) {
                Ok(store) => Some(store),
                Err(e) => {
                    tracing::warn!("No persisted environment available: {}", e);
                    ui.warning(&format!("Not persisting changes: {}", e));
                    None
                }
            }
        } else {
            None
        };

        let provisioner = Provisioner::new(&config, &self.project_root, &runner, timeout);
        let run = provisioner.run(
            &mut env,
            store
                .as_mut()
                .map(|s| &mut **s as &mut dyn PersistedEnvironment),
            ui,
        );

        if let Some(store) = &store {
            if persisted_anything(&run) {
                ui.show_hint(&format!(
                    "Saved to {}; open a new shell to pick up the changes",
                    store.describe()
                ));
            }
        }

        Ok(CommandResult::from_exit_code(run.exit_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_flag_overrides_config() {
        let mut config = TessupConfig::default();
        config.settings.timeout_secs = Some(600);
        let cmd = ProvisionCommand::new(
            Path::new("/p"),
            None,
            ProvisionArgs {
                persist: false,
                timeout: Some(30),
            },
        );
        assert_eq!(cmd.timeout(&config), Some(Duration::from_secs(30)));
    }

    #[test]
    fn timeout_falls_back_to_config() {
        let mut config = TessupConfig::default();
        config.settings.timeout_secs = Some(600);
        let cmd = ProvisionCommand::new(Path::new("/p"), None, ProvisionArgs::default());
        assert_eq!(cmd.timeout(&config), Some(Duration::from_secs(600)));
    }

    #[test]
    fn persistence_is_off_by_default() {
        let config = TessupConfig::default();
        let cmd = ProvisionCommand::new(Path::new("/p"), None, ProvisionArgs::default());
        assert!(!cmd.persist(&config));

        let mut config = TessupConfig::default();
        config.settings.persist = true;
        assert!(cmd.persist(&config));

        let flagged = ProvisionCommand::new(
            Path::new("/p"),
            None,
            ProvisionArgs {
                persist: true,
                timeout: None,
            },
        );
        assert!(flagged.persist(&TessupConfig::default()));
    }
}
