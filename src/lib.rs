//! tessup - Provision Tesseract OCR and its language data for a project.
//!
//! tessup makes sure a project can run OCR: the `tesseract` binary resolves
//! on `PATH`, the required language models sit in the project's `tessdata`
//! directory, and `TESSDATA_PREFIX` points there. Running it twice changes
//! nothing the second time.
//!
//! # Modules
//!
//! - [`assets`] - Required data files and how they are fetched
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`detection`] - Binary resolution and version probing
//! - [`environment`] - Session and persisted environment handles
//! - [`error`] - Error types, result alias and exit codes
//! - [`install`] - Installation strategies and their orchestration
//! - [`pipeline`] - The end-to-end provisioning run
//! - [`report`] - Final validation and messages
//! - [`search_path`] - Idempotent `PATH` updates
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use tessup::config::TessupConfig;
//! use tessup::environment::{MemoryEnvironment, PATH_VAR};
//! use tessup::pipeline::Provisioner;
//! use tessup::report::ProvisionStatus;
//! use tessup::shell::MockRunner;
//! use tempfile::TempDir;
//!
//! let project = TempDir::new().unwrap();
//! let runner = MockRunner::new();
//! let provisioner = Provisioner::new(&TessupConfig::default(), project.path(), &runner, None);
//!
//! let env = MemoryEnvironment::new().with_var(PATH_VAR, "");
//! let result = provisioner.check(&env);
//! assert_eq!(result.status(), ProvisionStatus::ToolMissing);
//! assert_eq!(result.exit_code(), 1);
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod detection;
pub mod environment;
pub mod error;
pub mod install;
pub mod pipeline;
pub mod report;
pub mod search_path;
pub mod shell;
pub mod ui;

pub use error::{Result, TessupError};
