//! Check command implementation.
//!
//! The `tessup check` command detects and validates without installing,
//! fetching or writing any environment value.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::detection::probe_version;
use crate::environment::ProcessEnvironment;
use crate::error::{Result, TessupError};
use crate::pipeline::Provisioner;
use crate::report::report;
use crate::shell::SystemRunner;
use crate::ui::UserInterface;

use super::dispatcher::{load_validated, Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_validated(&self.project_root, self.config_path.as_deref())?;
        let timeout = config.settings.timeout_secs.map(std::time::Duration::from_secs);
        let runner = SystemRunner::new();
        let env = ProcessEnvironment::new();
        let provisioner = Provisioner::new(&config, &self.project_root, &runner, timeout);

        let result = provisioner.check(&env);

        if self.args.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| TessupError::Other(e.into()))?;
            println!("{}", json);
        } else {
            let binary = &provisioner.descriptor().binary;
            ui.show_header(&format!("Checking {}", binary));
            if let Some(path) = result.tool_path() {
                if let Some(version) =
                    probe_version(path, &provisioner.descriptor().probe_args, &runner, timeout)
                {
                    ui.show_field("version", &version);
                }
            }
            report(&result, binary, ui);
        }

        Ok(CommandResult::from_exit_code(result.exit_code()))
    }
}
