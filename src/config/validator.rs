//! Configuration validation rules.
//!
//! Every problem is collected, not just the first, so one edit can fix
//! them all.

use crate::config::schema::TessupConfig;
use crate::error::{Result, TessupError};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &TessupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_tool(config));
    errors.extend(validate_assets(config));
    errors.extend(validate_settings(config));

    errors
}

/// Validate a configuration, failing with every message joined.
pub fn validate(config: &TessupConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(TessupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

fn validate_tool(config: &TessupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let tool = &config.tool;

    if tool.binary.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-binary",
            "tool.binary must not be empty".to_string(),
        ));
    } else if has_path_separator(&tool.binary) {
        errors.push(ValidationError::new(
            "binary-path",
            format!(
                "tool.binary '{}' must be a bare name, not a path",
                tool.binary
            ),
        ));
    }

    for pm in &tool.package_managers {
        if pm.name.trim().is_empty() || pm.program.trim().is_empty() {
            errors.push(ValidationError::new(
                "package-manager-name",
                "package managers need both 'name' and 'program'".to_string(),
            ));
        }
        if pm.install.is_empty() {
            errors.push(ValidationError::new(
                "package-manager-install",
                format!("package manager '{}' has no install command", pm.name),
            ));
        }
    }

    errors
}

fn validate_assets(config: &TessupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let assets = &config.assets;

    if assets.files.is_empty() {
        errors.push(ValidationError::new(
            "no-assets",
            "assets.files must list at least one file".to_string(),
        ));
    }

    if assets.env_var.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-env-var",
            "assets.env_var must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for file in &assets.files {
        if file.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-asset-name",
                "asset file names must not be empty".to_string(),
            ));
            continue;
        }
        if has_path_separator(&file.name) || file.name == "." || file.name == ".." {
            errors.push(ValidationError::new(
                "asset-path",
                format!("asset '{}' must be a plain file name", file.name),
            ));
        }
        if !seen.insert(file.name.as_str()) {
            errors.push(ValidationError::new(
                "duplicate-asset",
                format!("asset '{}' is listed more than once", file.name),
            ));
        }
        if let Some(sha) = &file.sha256 {
            if !is_sha256_hex(sha) {
                errors.push(ValidationError::new(
                    "bad-checksum",
                    format!(
                        "asset '{}' sha256 must be 64 hexadecimal characters",
                        file.name
                    ),
                ));
            }
        }
        if file.url.is_none() && assets.base_url.trim().is_empty() {
            errors.push(ValidationError::new(
                "no-url",
                format!("asset '{}' has no url and assets.base_url is empty", file.name),
            ));
        }
    }

    errors
}

fn validate_settings(config: &TessupConfig) -> Vec<ValidationError> {
    match config.settings.timeout_secs {
        Some(0) => vec![ValidationError::new(
            "zero-timeout",
            "settings.timeout_secs must be greater than zero".to_string(),
        )],
        _ => Vec::new(),
    }
}

fn has_path_separator(name: &str) -> bool {
    name.contains('/') || name.contains('\\')
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}
