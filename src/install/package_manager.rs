//! OS package manager strategy.

use std::path::PathBuf;

use crate::config::PackageManagerConfig;
use crate::detection::resolve;
use crate::shell::{CommandResult, Invocation};

use super::strategy::{InstallContext, InstallOutcome, InstallStrategy, StrategyKind};

/// A package manager and the commands that drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerSpec {
    /// Display name.
    pub name: String,
    /// Program that must resolve for this manager to apply.
    pub program: String,
    /// Query command, program first. Empty means always install.
    pub query: Vec<String>,
    /// Install command, program first.
    pub install: Vec<String>,
    /// Directories where the manager places the binary.
    pub install_dirs: Vec<PathBuf>,
}

impl From<&PackageManagerConfig> for PackageManagerSpec {
    fn from(config: &PackageManagerConfig) -> Self {
        Self {
            name: config.name.clone(),
            program: config.program.clone(),
            query: config.query.clone(),
            install: config.install.clone(),
            install_dirs: config.install_dirs.clone(),
        }
    }
}

/// Install through a package manager.
///
/// The query runs once; exit 0 means the package is already registered and
/// no install is attempted. Otherwise the install runs exactly once.
#[derive(Debug, Clone)]
pub struct PackageManagerStrategy {
    spec: PackageManagerSpec,
}

impl PackageManagerStrategy {
    /// Wrap a spec.
    pub fn new(spec: PackageManagerSpec) -> Self {
        Self { spec }
    }

    /// The underlying spec.
    pub fn spec(&self) -> &PackageManagerSpec {
        &self.spec
    }

    fn invocation(argv: &[String], ctx: &InstallContext<'_>) -> Option<Invocation> {
        let (program, args) = argv.split_first()?;
        Some(
            Invocation::new(program)
                .args(args.iter().cloned())
                .timeout(ctx.timeout),
        )
    }

    fn is_registered(&self, ctx: &InstallContext<'_>) -> bool {
        let Some(query) = Self::invocation(&self.spec.query, ctx) else {
            return false;
        };
        match ctx.runner.run(&query) {
            Ok(result) => {
                tracing::debug!(
                    "{} query exited {:?}",
                    self.spec.name,
                    result.exit_code
                );
                result.success
            }
            Err(e) => {
                tracing::debug!("{} query could not run: {}", self.spec.name, e);
                false
            }
        }
    }
}

fn failure_reason(result: &CommandResult) -> String {
    let code = result
        .exit_code
        .map(|c| format!("exit code {}", c))
        .unwrap_or_else(|| "terminated by signal".to_string());
    match result.last_output_line() {
        Some(line) => format!("{}: {}", code, line),
        None => code,
    }
}

impl InstallStrategy for PackageManagerStrategy {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::PackageManager
    }

    fn is_applicable(&self, ctx: &InstallContext<'_>) -> bool {
        resolve(&self.spec.program, &*ctx.env).is_some()
    }

    fn apply(&self, ctx: &mut InstallContext<'_>) -> InstallOutcome {
        let name = self.spec.name.clone();

        if self.is_registered(ctx) {
            ctx.ui
                .success(&format!("{} reports the package is already installed", name));
            return InstallOutcome::Installed {
                strategy: name,
                already_registered: true,
            };
        }

        let Some(install) = Self::invocation(&self.spec.install, ctx) else {
            return InstallOutcome::Failed {
                strategy: name,
                reason: "no install command configured".to_string(),
            };
        };

        let mut spinner = ctx
            .ui
            .start_spinner(&format!("Installing via {}...", name));
        tracing::debug!("Running {}", install.command_line());

        match ctx.runner.run(&install) {
            Ok(result) if result.success => {
                spinner.finish_success(&format!("Installed via {}", name));
                InstallOutcome::Installed {
                    strategy: name,
                    already_registered: false,
                }
            }
            Ok(result) => {
                let reason = failure_reason(&result);
                spinner.finish_error(&format!("{} install failed ({})", name, reason));
                tracing::warn!("{} install failed: {}", name, reason);
                InstallOutcome::Failed {
                    strategy: name,
                    reason,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                spinner.finish_error(&format!("{} install failed ({})", name, reason));
                tracing::warn!("{} install failed: {}", name, reason);
                InstallOutcome::Failed {
                    strategy: name,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryEnvironment;
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::{MockUI, SpinnerStatus};
    use std::time::Duration;

    fn winget() -> PackageManagerStrategy {
        PackageManagerStrategy::new(PackageManagerSpec {
            name: "winget".to_string(),
            program: "winget".to_string(),
            query: vec!["winget".into(), "list".into(), "--id".into(), "Pkg".into()],
            install: vec![
                "winget".into(),
                "install".into(),
                "--id".into(),
                "Pkg".into(),
                "--silent".into(),
            ],
            install_dirs: vec![],
        })
    }

    fn run(strategy: &PackageManagerStrategy, runner: &MockRunner) -> (InstallOutcome, MockUI) {
        let mut env = MemoryEnvironment::new();
        let mut ui = MockUI::new();
        let outcome = {
            let mut ctx = InstallContext {
                env: &mut env,
                runner,
                ui: &mut ui,
                timeout: Some(Duration::from_secs(5)),
            };
            strategy.apply(&mut ctx)
        };
        (outcome, ui)
    }

    #[test]
    fn unregistered_package_gets_one_query_and_one_install() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::exit(1));
        runner.on("winget install", MockResponse::exit(0));

        let (outcome, ui) = run(&winget(), &runner);

        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                strategy: "winget".to_string(),
                already_registered: false
            }
        );
        assert_eq!(runner.count("winget list"), 1);
        assert_eq!(runner.count("winget install"), 1);
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(ui.spinner_results()[0].0, SpinnerStatus::Success);
    }

    #[test]
    fn registered_package_skips_install() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::output("Pkg 5.3.3"));

        let (outcome, _ui) = run(&winget(), &runner);

        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                strategy: "winget".to_string(),
                already_registered: true
            }
        );
        assert_eq!(runner.count("winget install"), 0);
    }

    #[test]
    fn failed_install_is_reported_not_raised() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::exit(1));
        runner.on(
            "winget install",
            MockResponse::Exit {
                code: 1,
                stdout: "Installer failed\nNo applicable installer found".to_string(),
            },
        );

        let (outcome, ui) = run(&winget(), &runner);

        match outcome {
            InstallOutcome::Failed { strategy, reason } => {
                assert_eq!(strategy, "winget");
                assert!(reason.contains("No applicable installer found"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(ui.spinner_results()[0].0, SpinnerStatus::Error);
    }

    #[test]
    fn install_timeout_is_failure() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::exit(1));
        runner.on("winget install", MockResponse::Timeout);

        let (outcome, _ui) = run(&winget(), &runner);
        assert!(matches!(outcome, InstallOutcome::Failed { ref reason, .. } if reason.contains("timed out")));
    }

    #[test]
    fn query_spawn_error_counts_as_unregistered() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::SpawnError);

        let (outcome, _ui) = run(&winget(), &runner);
        assert!(matches!(outcome, InstallOutcome::Installed { already_registered: false, .. }));
        assert_eq!(runner.count("winget install"), 1);
    }

    #[test]
    fn empty_query_goes_straight_to_install() {
        let mut spec = winget().spec().clone();
        spec.query.clear();
        let runner = MockRunner::new();

        let (_outcome, _ui) = run(&PackageManagerStrategy::new(spec), &runner);
        assert_eq!(runner.calls().len(), 1);
        assert_eq!(runner.count("winget install"), 1);
    }

    #[test]
    fn install_receives_timeout() {
        let runner = MockRunner::new();
        runner.on("winget list", MockResponse::exit(1));
        run(&winget(), &runner);
        assert!(runner
            .calls()
            .iter()
            .all(|c| c.timeout == Some(Duration::from_secs(5))));
    }

    #[test]
    fn unresolvable_program_is_not_applicable() {
        let strategy = winget();
        let mut env = MemoryEnvironment::new();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let ctx = InstallContext {
            env: &mut env,
            runner: &runner,
            ui: &mut ui,
            timeout: None,
        };
        assert!(!strategy.is_applicable(&ctx));
    }
}
