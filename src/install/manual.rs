//! Last-resort strategy: tell the user what to do.

use std::path::{Path, PathBuf};

use super::strategy::{InstallContext, InstallOutcome, InstallStrategy, StrategyKind};

/// Always applicable; performs nothing and prints platform guidance.
#[derive(Debug, Clone)]
pub struct ManualStrategy {
    guidance: Vec<String>,
}

impl ManualStrategy {
    /// Guidance for this platform, mentioning `bundled_dir` as an option.
    pub fn for_platform(binary: &str, bundled_dir: &Path) -> Self {
        Self {
            guidance: platform_guidance(binary, bundled_dir),
        }
    }

    /// Explicit guidance lines.
    pub fn with_guidance(guidance: Vec<String>) -> Self {
        Self { guidance }
    }

    /// The guidance lines.
    pub fn guidance(&self) -> &[String] {
        &self.guidance
    }
}

fn platform_guidance(binary: &str, bundled_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = if cfg!(windows) {
        vec![
            "Install Tesseract with the UB Mannheim installer: https://github.com/UB-Mannheim/tesseract/wiki".to_string(),
            "or run: winget install --id UB-Mannheim.TesseractOCR --exact".to_string(),
        ]
    } else if cfg!(target_os = "macos") {
        vec!["Install Tesseract with Homebrew: brew install tesseract".to_string()]
    } else {
        vec![
            "Install Tesseract with your package manager, e.g. sudo apt-get install tesseract-ocr"
                .to_string(),
        ]
    };
    let exe: PathBuf = bundled_dir.join(crate::detection::binary_file_name(binary));
    lines.push(format!("or place a {} build at {}", binary, exe.display()));
    lines.push("then run tessup again".to_string());
    lines
}

impl InstallStrategy for ManualStrategy {
    fn name(&self) -> &str {
        "manual"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Manual
    }

    fn is_applicable(&self, _ctx: &InstallContext<'_>) -> bool {
        true
    }

    fn apply(&self, ctx: &mut InstallContext<'_>) -> InstallOutcome {
        ctx.ui
            .warning("No automated install method is available on this machine");
        for line in &self.guidance {
            ctx.ui.show_hint(line);
        }
        InstallOutcome::Unavailable {
            guidance: self.guidance.clone(),
        }
    }
}
