//! Environment values tessup reads and writes.
//!
//! Two scopes exist:
//!
//! - the session, through an [`Environment`] handle ([`ProcessEnvironment`]
//!   in production, [`MemoryEnvironment`] in tests), and
//! - the persisted user profile, through a [`PersistedEnvironment`].
//!
//! Only two values are ever written: the search path and the
//! data-directory pointer.

pub mod handle;
pub mod persisted;

pub use handle::{Environment, MemoryEnvironment, PathSyntax, ProcessEnvironment, PATH_VAR};
pub use persisted::{
    default_store, MemoryStore, PersistedEnvironment, ShellProfileStore, WindowsUserStore,
    PROFILE_MARKER,
};
