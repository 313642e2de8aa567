//! Final messages.

use crate::ui::UserInterface;

use super::result::{ProvisionStatus, ProvisioningResult};

/// Print the message set for `result`.
///
/// Messages restate the result and nothing else, so they always agree with
/// the exit code.
pub fn report(result: &ProvisioningResult, binary: &str, ui: &mut dyn UserInterface) {
    match result.status() {
        ProvisionStatus::Success => {
            let location = result
                .tool_path()
                .map(|p| format!(" at {}", p.display()))
                .unwrap_or_default();
            ui.success(&format!("{} is available{}", binary, location));
            ui.success("All required assets are present");
        }
        ProvisionStatus::ToolMissing => {
            ui.error(&format!("{} is not available on PATH", binary));
            if !result.missing_assets().is_empty() {
                ui.warning(&format!(
                    "Also missing: {}",
                    result.missing_assets().join(", ")
                ));
            }
        }
        ProvisionStatus::AssetsMissing => {
            ui.error(&format!(
                "Missing assets: {}",
                result.missing_assets().join(", ")
            ));
        }
    }
    ui.show_field("status", &result.status().to_string());
    ui.show_field("exit code", &result.exit_code().to_string());
}
