//! Final classification of a run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::assets::{missing, AssetRequirement};
use crate::detection::resolve;
use crate::environment::Environment;
use crate::install::ToolDescriptor;

/// Overall status. Each maps to a stable exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProvisionStatus {
    /// Tool resolvable and every asset present.
    Success,
    /// Tool not resolvable on the session search path.
    ToolMissing,
    /// Tool resolvable, some assets absent.
    AssetsMissing,
}

impl ProvisionStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ToolMissing => 1,
            Self::AssetsMissing => 2,
        }
    }
}

impl fmt::Display for ProvisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "Success",
            Self::ToolMissing => "ToolMissing",
            Self::AssetsMissing => "AssetsMissing",
        };
        f.write_str(s)
    }
}

/// Outcome of [`validate`]. Built once, never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningResult {
    status: ProvisionStatus,
    missing_assets: Vec<String>,
    exit_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_path: Option<PathBuf>,
}

impl ProvisioningResult {
    fn new(status: ProvisionStatus, missing_assets: Vec<String>, tool_path: Option<PathBuf>) -> Self {
        Self {
            status,
            missing_assets,
            exit_code: status.exit_code(),
            tool_path,
        }
    }

    /// Overall status.
    pub fn status(&self) -> ProvisionStatus {
        self.status
    }

    /// Required assets absent from disk.
    pub fn missing_assets(&self) -> &[String] {
        &self.missing_assets
    }

    /// Process exit code.
    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Where the tool resolved, if it did.
    pub fn tool_path(&self) -> Option<&PathBuf> {
        self.tool_path.as_ref()
    }

    /// Whether the run fully succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ProvisionStatus::Success
    }
}

/// Re-probe the final state and classify it.
///
/// Nothing recorded by earlier stages is trusted: the binary is resolved
/// again against `env` and every asset is checked on disk.
pub fn validate(
    descriptor: &ToolDescriptor,
    requirements: &[AssetRequirement],
    env: &dyn Environment,
) -> ProvisioningResult {
    let tool_path = resolve(&descriptor.binary, env);
    let missing_assets = missing(requirements);

    let status = match (&tool_path, missing_assets.is_empty()) {
        (None, _) => ProvisionStatus::ToolMissing,
        (Some(_), false) => ProvisionStatus::AssetsMissing,
        (Some(_), true) => ProvisionStatus::Success,
    };

    tracing::debug!("Validation status: {}", status);
    ProvisioningResult::new(status, missing_assets, tool_path)
}
