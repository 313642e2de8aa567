//! External process execution and shell detection.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{CommandResult, CommandRunner, Invocation, SystemRunner};
pub use mock::{MockResponse, MockRunner};
pub use platform::{detect_shell, is_ci, ShellType};
