//! Error types for tessup operations.
//!
//! This module defines [`TessupError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Provisioning stages never propagate errors across stage boundaries.
//!   Failures of external calls are caught where they happen and recorded as
//!   outcomes (see [`crate::install::InstallOutcome`] and
//!   [`crate::assets::AssetOutcome`]).
//! - `TessupError` is used for the calls themselves and for configuration
//!   problems, which are reported before the pipeline starts.
//! - Use `anyhow::Error` (via `TessupError::Other`) for unexpected errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for tessup operations.
#[derive(Debug, Error)]
pub enum TessupError {
    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command ran past its deadline and was killed.
    #[error("Command timed out after {}s: {command}", timeout.as_secs())]
    CommandTimedOut { command: String, timeout: Duration },

    /// Reading or writing the persisted user environment failed.
    #[error("Could not update persisted environment ({store}): {message}")]
    PersistFailed { store: String, message: String },

    /// A data file could not be fetched.
    #[error("Failed to fetch '{asset}': {message}")]
    AssetFetchFailed { asset: String, message: String },

    /// A fetched data file did not match its pinned checksum.
    #[error("Checksum mismatch for '{asset}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for tessup operations.
pub type Result<T> = std::result::Result<T, TessupError>;

/// Exit code for an invalid or unreadable configuration.
pub const EXIT_CONFIG: u8 = 3;

/// Exit code for command-line usage errors (`EX_USAGE`).
pub const EXIT_USAGE: u8 = 64;

/// Exit code for unexpected internal failures (`EX_SOFTWARE`).
pub const EXIT_INTERNAL: u8 = 70;

impl TessupError {
    /// Whether this error comes from loading or validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
        )
    }

    /// Process exit code when this error ends a command.
    ///
    /// Never collides with the provisioning codes 0, 1 and 2.
    pub fn exit_code(&self) -> u8 {
        if self.is_config_error() {
            EXIT_CONFIG
        } else {
            EXIT_INTERNAL
        }
    }
}
