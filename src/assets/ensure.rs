//! Make every required asset present.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::environment::{Environment, PersistedEnvironment};
use crate::error::TessupError;
use crate::ui::UserInterface;

use super::fetcher::Fetcher;
use super::requirement::AssetRequirement;

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AssetOutcome {
    /// Already on disk; nothing fetched.
    Present,
    /// Fetched this run.
    Fetched,
    /// Fetch failed.
    Failed(String),
}

/// Ensure each requirement exists, fetching the missing ones.
///
/// Requirements are handled independently: one failure never stops the
/// rest. Results come back in input order.
pub fn ensure_assets(
    requirements: &[AssetRequirement],
    fetcher: &dyn Fetcher,
    ui: &mut dyn UserInterface,
) -> Vec<(String, AssetOutcome)> {
    requirements
        .iter()
        .map(|req| (req.filename.clone(), ensure_one(req, fetcher, ui)))
        .collect()
}

fn ensure_one(
    req: &AssetRequirement,
    fetcher: &dyn Fetcher,
    ui: &mut dyn UserInterface,
) -> AssetOutcome {
    if req.is_present() {
        tracing::debug!("{} already present", req.filename);
        if ui.output_mode().shows_detail() {
            ui.success(&format!("{} present", req.filename));
        }
        return AssetOutcome::Present;
    }

    if let Err(e) = fs::create_dir_all(&req.dest_dir) {
        let reason = format!("could not create {}: {}", req.dest_dir.display(), e);
        tracing::warn!("{}: {}", req.filename, reason);
        ui.error(&format!("{}: {}", req.filename, reason));
        return AssetOutcome::Failed(reason);
    }

    let mut spinner = ui.start_spinner(&format!("Fetching {}...", req.filename));
    match fetcher.fetch(req) {
        Ok(()) => {
            spinner.finish_success(&format!("Fetched {}", req.filename));
            AssetOutcome::Fetched
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            let err = TessupError::AssetFetchFailed {
                asset: req.filename.clone(),
                message: reason.clone(),
            };
            tracing::warn!("{}", err);
            spinner.finish_error(&err.to_string());
            AssetOutcome::Failed(reason)
        }
    }
}

/// What happened to the data-directory pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DataDirUpdate {
    /// The session value was written.
    pub session_set: bool,
    /// The persisted value was written.
    pub persisted_set: bool,
    /// Persisting failed with this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

/// Point `var` at `dir` once `dir` exists.
///
/// Does nothing when the directory is absent. Values already equal to
/// `dir` are not rewritten.
pub fn point_data_dir(
    var: &str,
    dir: &Path,
    env: &mut dyn Environment,
    store: Option<&mut dyn PersistedEnvironment>,
) -> DataDirUpdate {
    let mut update = DataDirUpdate::default();
    if !dir.is_dir() {
        tracing::debug!("{} does not exist, leaving {} alone", dir.display(), var);
        return update;
    }
    let value = dir.to_string_lossy();

    if env.var(var).as_deref() != Some(&*value) {
        env.set_var(var, &value);
        update.session_set = true;
    }

    if let Some(store) = store {
        match store.var(var) {
            Ok(Some(current)) if current == value => {}
            Ok(_) => match store.set_var(var, &value) {
                Ok(()) => update.persisted_set = true,
                Err(e) => {
                    tracing::warn!("Could not persist {}: {}", var, e);
                    update.persist_error = Some(e.to_string());
                }
            },
            Err(e) => {
                tracing::warn!("Could not read persisted {}: {}", var, e);
                update.persist_error = Some(e.to_string());
            }
        }
    }

    update
}
