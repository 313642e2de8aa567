//! Idempotent search-path mutation.

use crate::environment::{Environment, PathSyntax, PersistedEnvironment};

/// An ordered search path with normalized membership checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<String>,
    syntax: PathSyntax,
}

impl SearchPath {
    /// Parse a raw search-path value.
    pub fn parse(value: &str, syntax: PathSyntax) -> Self {
        Self {
            entries: syntax.split(value),
            syntax,
        }
    }

    /// Build from already-split entries.
    pub fn from_entries(entries: Vec<String>, syntax: PathSyntax) -> Self {
        Self { entries, syntax }
    }

    /// Whether `dir` is already present.
    pub fn contains(&self, dir: &str) -> bool {
        self.entries.iter().any(|e| self.syntax.same_dir(e, dir))
    }
}

/// What happened to the persisted search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Persistence was not requested.
    NotRequested,
    /// The directory was already persisted.
    AlreadyPresent,
    /// The directory was appended.
    Added,
    /// Reading or writing the store failed; the session change still stands.
    Failed(String),
}

/// Result of one [`ensure_on_path`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUpdate {
    /// The directory as passed in.
    pub dir: String,
    /// Whether the session search path was extended.
    pub session_added: bool,
    /// Persisted-scope outcome.
    pub persisted: PersistOutcome,
}

impl PathUpdate {
    /// Whether anything was written.
    pub fn changed(&self) -> bool {
        self.session_added || self.persisted == PersistOutcome::Added
    }
}

/// Ensure `dir` is on the session search path and, if `store` is given, on
/// the persisted one.
///
/// The session value is only ever appended to, so an existing value is left
/// byte-for-byte intact when `dir` is already a member. Calling this again
/// with the same directory is a no-op.
pub fn ensure_on_path(
    dir: &str,
    store: Option<&mut dyn PersistedEnvironment>,
    env: &mut dyn Environment,
) -> PathUpdate {
    let syntax = env.path_syntax();
    let current = env.search_path();
    let session = SearchPath::parse(&current, syntax);

    let session_added = if session.contains(dir) {
        tracing::debug!("{} already on session search path", dir);
        false
    } else {
        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{}{}{}", current, syntax.separator(), dir)
        };
        env.set_search_path(&updated);
        tracing::debug!("Appended {} to session search path", dir);
        true
    };

    let persisted = match store {
        None => PersistOutcome::NotRequested,
        Some(store) => persist(dir, store),
    };

    PathUpdate {
        dir: dir.to_string(),
        session_added,
        persisted,
    }
}

fn persist(dir: &str, store: &mut dyn PersistedEnvironment) -> PersistOutcome {
    let entries = match store.search_path() {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read persisted search path: {}", e);
            return PersistOutcome::Failed(e.to_string());
        }
    };
    if SearchPath::from_entries(entries, store.path_syntax()).contains(dir) {
        return PersistOutcome::AlreadyPresent;
    }
    match store.append_search_path(dir) {
        Ok(()) => {
            tracing::debug!("Persisted {} to {}", dir, store.describe());
            PersistOutcome::Added
        }
        Err(e) => {
            tracing::warn!("Could not persist {}: {}", dir, e);
            PersistOutcome::Failed(e.to_string())
        }
    }
}
