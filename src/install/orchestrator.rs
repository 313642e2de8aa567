//! First-applicable-wins strategy selection.

use crate::detection::is_resolvable;

use super::descriptor::ToolDescriptor;
use super::strategy::{InstallContext, InstallOutcome};

/// Make the tool available if it is not already.
///
/// When the binary already resolves nothing is attempted. Otherwise the
/// first strategy whose precondition holds is applied and its outcome is
/// final, success or not.
pub fn install(descriptor: &ToolDescriptor, ctx: &mut InstallContext<'_>) -> InstallOutcome {
    if is_resolvable(&descriptor.binary, &*ctx.env) {
        tracing::debug!("{} already resolvable, skipping install", descriptor.binary);
        return InstallOutcome::Skipped;
    }

    for strategy in &descriptor.strategies {
        if !strategy.is_applicable(ctx) {
            tracing::debug!("Strategy {} not applicable", strategy.name());
            continue;
        }
        tracing::debug!("Applying strategy {}", strategy.name());
        return strategy.apply(ctx);
    }

    InstallOutcome::Unavailable {
        guidance: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PackageManagerConfig, ToolConfig};
    use crate::detection::binary_file_name;
    use crate::environment::{Environment, MemoryEnvironment, PATH_VAR};
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::MockUI;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn tool_config(project: &Path, managers: Vec<PackageManagerConfig>) -> ToolConfig {
        ToolConfig {
            binary: "tesseract".to_string(),
            probe_args: vec!["--version".to_string()],
            candidate_dirs: vec![],
            bundled_dir: project.join("tools"),
            package_managers: managers,
        }
    }

    fn fakepm() -> PackageManagerConfig {
        PackageManagerConfig {
            name: "fakepm".to_string(),
            program: "fakepm".to_string(),
            query: vec!["fakepm".to_string(), "query".to_string()],
            install: vec!["fakepm".to_string(), "install".to_string()],
            install_dirs: vec![],
        }
    }

    fn run_install(
        descriptor: &ToolDescriptor,
        env: &mut MemoryEnvironment,
        runner: &MockRunner,
    ) -> (InstallOutcome, MockUI) {
        let mut ui = MockUI::new();
        let outcome = {
            let mut ctx = InstallContext {
                env,
                runner,
                ui: &mut ui,
                timeout: None,
            };
            install(descriptor, &mut ctx)
        };
        (outcome, ui)
    }

    #[test]
    #[cfg(unix)]
    fn detected_tool_means_zero_install_attempts() {
        let project = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        make_executable(&bin.path().join("tesseract"));
        make_executable(&bin.path().join("fakepm"));
        let descriptor =
            ToolDescriptor::from_config(&tool_config(project.path(), vec![fakepm()]), project.path());
        let mut env = MemoryEnvironment::new().with_var(PATH_VAR, &bin.path().to_string_lossy());
        let runner = MockRunner::new();

        let (outcome, _ui) = run_install(&descriptor, &mut env, &runner);

        assert_eq!(outcome, InstallOutcome::Skipped);
        assert!(runner.is_untouched());
    }

    #[test]
    #[cfg(unix)]
    fn package_manager_gets_one_query_and_one_install() {
        let project = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        make_executable(&bin.path().join("fakepm"));
        let descriptor =
            ToolDescriptor::from_config(&tool_config(project.path(), vec![fakepm()]), project.path());
        let mut env = MemoryEnvironment::new().with_var(PATH_VAR, &bin.path().to_string_lossy());
        let runner = MockRunner::new();
        runner.on("fakepm query", MockResponse::exit(1));

        let (outcome, _ui) = run_install(&descriptor, &mut env, &runner);

        assert!(matches!(outcome, InstallOutcome::Installed { ref strategy, already_registered: false } if strategy == "fakepm"));
        assert_eq!(runner.count("fakepm query"), 1);
        assert_eq!(runner.count("fakepm install"), 1);
    }

    #[test]
    #[cfg(unix)]
    fn failed_strategy_is_final() {
        let project = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        make_executable(&bin.path().join("fakepm"));
        make_executable(&bin.path().join("otherpm"));
        let mut other = fakepm();
        other.name = "otherpm".to_string();
        other.program = "otherpm".to_string();
        other.query = vec!["otherpm".to_string(), "query".to_string()];
        other.install = vec!["otherpm".to_string(), "install".to_string()];
        let descriptor = ToolDescriptor::from_config(
            &tool_config(project.path(), vec![fakepm(), other]),
            project.path(),
        );
        let mut env = MemoryEnvironment::new().with_var(PATH_VAR, &bin.path().to_string_lossy());
        let runner = MockRunner::new();
        runner.on("fakepm query", MockResponse::exit(1));
        runner.on("fakepm install", MockResponse::exit(100));

        let (outcome, ui) = run_install(&descriptor, &mut env, &runner);

        assert!(matches!(outcome, InstallOutcome::Failed { ref strategy, .. } if strategy == "fakepm"));
        assert_eq!(runner.count("otherpm"), 0);
        assert!(ui.hints().is_empty());
    }

    #[test]
    fn bundled_wins_over_package_manager() {
        let project = TempDir::new().unwrap();
        let tools = project.path().join("tools");
        fs::create_dir_all(&tools).unwrap();
        fs::write(tools.join(binary_file_name("tesseract")), "").unwrap();
        let descriptor =
            ToolDescriptor::from_config(&tool_config(project.path(), vec![fakepm()]), project.path());
        let mut env = MemoryEnvironment::new();
        let runner = MockRunner::new();

        let (outcome, _ui) = run_install(&descriptor, &mut env, &runner);

        assert!(matches!(outcome, InstallOutcome::Installed { ref strategy, .. } if strategy == "bundled"));
        assert!(runner.is_untouched());
        assert!(env.search_path().contains(&*tools.to_string_lossy()));
    }

    #[test]
    fn nothing_available_falls_through_to_manual() {
        let project = TempDir::new().unwrap();
        let descriptor =
            ToolDescriptor::from_config(&tool_config(project.path(), vec![fakepm()]), project.path());
        let empty = TempDir::new().unwrap();
        let mut env = MemoryEnvironment::new().with_var(PATH_VAR, &empty.path().to_string_lossy());
        let runner = MockRunner::new();

        let (outcome, ui) = run_install(&descriptor, &mut env, &runner);

        assert!(matches!(outcome, InstallOutcome::Unavailable { ref guidance } if !guidance.is_empty()));
        assert!(runner.is_untouched());
        assert!(!ui.hints().is_empty());
    }

    #[test]
    fn no_strategies_is_unavailable() {
        let descriptor = ToolDescriptor {
            binary: "tesseract".to_string(),
            probe_args: vec![],
            candidate_dirs: vec![],
            bundled_dir: PathBuf::from("/nonexistent"),
            package_managers: vec![],
            strategies: vec![],
        };
        let mut env = MemoryEnvironment::new();
        let runner = MockRunner::new();
        let (outcome, _ui) = run_install(&descriptor, &mut env, &runner);
        assert_eq!(outcome, InstallOutcome::Unavailable { guidance: vec![] });
    }
}
