//! External command execution.
//!
//! Every external process tessup starts (package manager queries and
//! installs, the version probe, custom fetch scripts, the Windows user
//! environment) goes through a [`CommandRunner`]. Production code uses
//! [`SystemRunner`]; tests substitute [`MockRunner`](super::MockRunner).

use crate::error::{Result, TessupError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last non-empty line of stderr, falling back to stdout.
    ///
    /// Package managers tend to put the useful part of a failure at the end.
    pub fn last_output_line(&self) -> Option<&str> {
        [&self.stderr, &self.stdout]
            .into_iter()
            .find_map(|s| s.lines().rev().map(str::trim).find(|l| !l.is_empty()))
    }
}

/// A single program invocation.
///
/// Programs are started directly, never through a shell, so arguments need no
/// quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to start (a resolved path or a bare name).
    pub program: PathBuf,
    /// Arguments.
    pub args: Vec<String>,
    /// Extra environment variables, merged over the inherited environment.
    pub env: Vec<(String, String)>,
    /// Working directory.
    pub cwd: Option<PathBuf>,
    /// Kill the process after this long.
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set (or clear) the timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Short human-readable form: program stem followed by arguments.
    ///
    /// Used in messages and for matching in tests, so it does not depend on
    /// where the program was resolved.
    pub fn command_line(&self) -> String {
        let name = self
            .program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        if self.args.is_empty() {
            name
        } else {
            format!("{} {}", name, self.args.join(" "))
        }
    }
}

/// Something that can run an [`Invocation`].
///
/// `Err` means the process could not be started or timed out; a process that
/// ran and exited non-zero is `Ok` with `success == false`.
pub trait CommandRunner {
    /// Run the invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let start = Instant::now();
        let command_line = invocation.command_line();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {}", command_line);

        let mut child = cmd.spawn().map_err(|e| {
            tracing::debug!("Failed to start {}: {}", command_line, e);
            TessupError::CommandFailed {
                command: command_line.clone(),
                code: None,
            }
        })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we wait on it.
        let stdout_handle = drain(child.stdout.take());
        let stderr_handle = drain(child.stderr.take());

        let status = match invocation.timeout {
            Some(timeout) => wait_with_deadline(&mut child, timeout, &command_line)?,
            None => child.wait().map_err(|_| TessupError::CommandFailed {
                command: command_line.clone(),
                code: None,
            })?,
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();
        let duration = start.elapsed();

        if status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
    command_line: &str,
) -> Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(status),
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TessupError::CommandTimedOut {
                    command: command_line.to_string(),
                    timeout,
                });
            }
            None => thread::sleep(Duration::from_millis(50)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_uses_program_stem() {
        let inv = Invocation::new("/usr/bin/brew").args(["list", "--versions", "tesseract"]);
        assert_eq!(inv.command_line(), "brew list --versions tesseract");
    }

    #[test]
    fn command_line_without_args() {
        let inv = Invocation::new("tesseract");
        assert_eq!(inv.command_line(), "tesseract");
    }

    #[test]
    fn builder_collects_env_and_timeout() {
        let inv = Invocation::new("sh")
            .arg("script.sh")
            .env("KEY", "value")
            .cwd("/tmp")
            .timeout(Some(Duration::from_secs(5)));
        assert_eq!(inv.args, vec!["script.sh"]);
        assert_eq!(inv.env, vec![("KEY".to_string(), "value".to_string())]);
        assert_eq!(inv.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(inv.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn last_output_line_prefers_stderr() {
        let result = CommandResult::failure(
            Some(1),
            "stdout line\n".to_string(),
            "first\nE: Unable to locate package\n\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.last_output_line(), Some("E: Unable to locate package"));
    }

    #[test]
    fn last_output_line_falls_back_to_stdout() {
        let result = CommandResult::failure(
            Some(1),
            "No package found matching input criteria.\n".to_string(),
            String::new(),
            Duration::ZERO,
        );
        assert_eq!(
            result.last_output_line(),
            Some("No package found matching input criteria.")
        );
    }

    #[test]
    fn missing_program_is_command_failed() {
        let runner = SystemRunner::new();
        let err = runner
            .run(&Invocation::new("this-command-does-not-exist-12345"))
            .unwrap_err();
        assert!(matches!(err, TessupError::CommandFailed { code: None, .. }));
    }

    #[test]
    #[cfg(unix)]
    fn captures_stdout_of_successful_command() {
        let runner = SystemRunner::new();
        let result = runner
            .run(&Invocation::new("sh").args(["-c", "echo hello"]))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    #[cfg(unix)]
    fn non_zero_exit_is_ok_failure() {
        let runner = SystemRunner::new();
        let result = runner
            .run(&Invocation::new("sh").args(["-c", "exit 3"]))
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    #[cfg(unix)]
    fn passes_extra_env() {
        let runner = SystemRunner::new();
        let result = runner
            .run(
                &Invocation::new("sh")
                    .args(["-c", "echo $TESSUP_TEST_VALUE"])
                    .env("TESSUP_TEST_VALUE", "from-env"),
            )
            .unwrap();
        assert!(result.stdout.contains("from-env"));
    }

    #[test]
    #[cfg(unix)]
    fn timeout_kills_long_running_command() {
        let runner = SystemRunner::new();
        let err = runner
            .run(
                &Invocation::new("sh")
                    .args(["-c", "sleep 5"])
                    .timeout(Some(Duration::from_millis(200))),
            )
            .unwrap_err();
        assert!(matches!(err, TessupError::CommandTimedOut { .. }));
    }
}
