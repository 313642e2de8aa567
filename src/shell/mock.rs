//! Scripted command runner for tests.
//!
//! `MockRunner` implements [`CommandRunner`] without starting processes.
//! Responses are registered against a command-line prefix (see
//! [`Invocation::command_line`]) and every call is recorded for assertions.
//!
//! # Example
//!
//! ```
//! use tessup::shell::{CommandRunner, Invocation, MockResponse, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.on("winget list", MockResponse::exit(1));
//!
//! let result = runner.run(&Invocation::new("winget").arg("list")).unwrap();
//! assert!(!result.success);
//! assert_eq!(runner.count("winget list"), 1);
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::{Result, TessupError};

use super::command::{CommandResult, CommandRunner, Invocation};

/// What a mocked command does.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Process ran and exited with this code and output.
    Exit { code: i32, stdout: String },
    /// Process could not be started.
    SpawnError,
    /// Process ran past its deadline.
    Timeout,
}

impl MockResponse {
    /// Exit with `code` and no output.
    pub fn exit(code: i32) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
        }
    }

    /// Exit 0 printing `stdout`.
    pub fn output(stdout: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.to_string(),
        }
    }
}

/// Command runner returning scripted results.
///
/// Unmatched commands succeed with no output.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<Vec<(String, MockResponse)>>,
    calls: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to any command line starting with `prefix`.
    ///
    /// Earlier registrations win.
    pub fn on(&self, prefix: &str, response: MockResponse) {
        self.responses
            .borrow_mut()
            .push((prefix.to_string(), response));
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Number of invocations whose command line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.command_line().starts_with(prefix))
            .count()
    }

    /// Whether nothing has been run.
    pub fn is_untouched(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();

        let response = self
            .responses
            .borrow()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| MockResponse::exit(0));

        match response {
            MockResponse::Exit { code: 0, stdout } => {
                Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
            }
            MockResponse::Exit { code, stdout } => Ok(CommandResult::failure(
                Some(code),
                stdout,
                String::new(),
                Duration::ZERO,
            )),
            MockResponse::SpawnError => Err(TessupError::CommandFailed {
                command: line,
                code: None,
            }),
            MockResponse::Timeout => Err(TessupError::CommandTimedOut {
                command: line,
                timeout: invocation.timeout.unwrap_or_default(),
            }),
        }
    }
}
