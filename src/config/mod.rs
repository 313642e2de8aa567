//! Configuration loading, parsing, and validation for tessup.
//!
//! - Schema definitions and platform defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use tessup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".tessup.yml"), "settings:\n  timeout_secs: 60\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.settings.timeout_secs, Some(60));
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{find_project_root, load_config, load_config_file, parse_config, CONFIG_FILE};
pub use schema::{
    AssetFile, AssetsConfig, PackageManagerConfig, Settings, TessupConfig, ToolConfig,
};
pub use validator::{validate, validate_config, ValidationError};
