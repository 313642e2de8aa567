//! Dependency detection.
//!
//! Answers one question: does the target binary resolve on the session's
//! search path? Absence is an ordinary answer, not an error.

pub mod resolve;
pub mod version;

pub use resolve::{
    binary_file_name, dir_contains_binary, directories_containing, is_resolvable, resolve,
};
pub use version::{extract_version, probe_version};
