//! Search-path configuration.
//!
//! Makes sure every directory known to hold the tool is on the session
//! search path exactly once, and, when persistence was requested, on the
//! persisted user search path exactly once. The two lists are separate
//! storage and are checked independently.
//!
//! # Example
//!
//! ```
//! use tessup::environment::{Environment, MemoryEnvironment, PathSyntax, PATH_VAR};
//! use tessup::search_path::ensure_on_path;
//!
//! let mut env = MemoryEnvironment::with_syntax(PathSyntax::UNIX).with_var(PATH_VAR, "/usr/bin");
//! ensure_on_path("/opt/tesseract/bin", None, &mut env);
//! ensure_on_path("/opt/tesseract/bin/", None, &mut env);
//! assert_eq!(env.search_path(), "/usr/bin:/opt/tesseract/bin");
//! ```

pub mod configurator;

pub use configurator::{ensure_on_path, PathUpdate, PersistOutcome, SearchPath};
