//! Validation and reporting.
//!
//! [`validate`] is the sole authority for the exit code.

pub mod reporter;
pub mod result;

pub use reporter::report;
pub use result::{validate, ProvisionStatus, ProvisioningResult};
