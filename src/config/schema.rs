//! Configuration schema definitions for tessup.
//!
//! This module contains the struct definitions that map to the
//! `.tessup.yml` file format. Every key is optional; anything left out
//! takes the defaults for the platform tessup was built for.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.tessup.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessupConfig {
    /// The tool to provision.
    pub tool: ToolConfig,

    /// Data files the tool needs.
    pub assets: AssetsConfig,

    /// Global settings.
    pub settings: Settings,
}

/// The external binary and how to obtain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Binary name, without platform suffix.
    pub binary: String,

    /// Arguments that make the binary print its version.
    pub probe_args: Vec<String>,

    /// Directories where the binary usually lands when installed by hand.
    pub candidate_dirs: Vec<PathBuf>,

    /// Directory holding a vendored copy (relative to the project root).
    pub bundled_dir: PathBuf,

    /// Package managers to try, in order.
    pub package_managers: Vec<PackageManagerConfig>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            probe_args: vec!["--version".to_string()],
            candidate_dirs: default_candidate_dirs(),
            bundled_dir: PathBuf::from("tools").join("tesseract"),
            package_managers: default_package_managers(),
        }
    }
}

/// One package manager.
///
/// `query` and `install` are full argument vectors, program first, since
/// some managers query through a different program (`dpkg -s` for apt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManagerConfig {
    /// Display name.
    pub name: String,

    /// Program whose presence makes this manager applicable.
    pub program: String,

    /// Command that exits 0 when the package is already registered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<String>,

    /// Non-interactive install command.
    pub install: Vec<String>,

    /// Where this manager puts the binary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_dirs: Vec<PathBuf>,
}

impl PackageManagerConfig {
    fn new(name: &str, program: &str, query: &[&str], install: &[&str], dirs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            query: query.iter().map(|s| s.to_string()).collect(),
            install: install.iter().map(|s| s.to_string()).collect(),
            install_dirs: dirs.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Data files and where they live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Destination directory (relative to the project root).
    pub dir: PathBuf,

    /// Variable pointed at `dir` once it exists.
    pub env_var: String,

    /// Base URL; each file is fetched from `<base_url><name>` unless it
    /// names its own URL.
    pub base_url: String,

    /// Required files.
    pub files: Vec<AssetFile>,

    /// Custom fetch script (relative to the project root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_script: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tessdata"),
            env_var: "TESSDATA_PREFIX".to_string(),
            base_url: "https://github.com/tesseract-ocr/tessdata/raw/main/".to_string(),
            files: vec![
                AssetFile::named("ara.traineddata"),
                AssetFile::named("fra.traineddata"),
            ],
            fetch_script: None,
        }
    }
}

/// One required data file.
///
/// Accepts either a bare filename or a map:
///
/// ```yaml
/// files:
///   - ara.traineddata
///   - name: fra.traineddata
///     sha256: 0f1e...
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AssetEntry")]
pub struct AssetFile {
    /// File name inside the destination directory.
    pub name: String,

    /// Source URL overriding `base_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Expected SHA-256, lowercase hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl AssetFile {
    /// A file fetched from the base URL with no checksum.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: None,
            sha256: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AssetEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        sha256: Option<String>,
    },
}

impl From<AssetEntry> for AssetFile {
    fn from(entry: AssetEntry) -> Self {
        match entry {
            AssetEntry::Name(name) => Self {
                name,
                url: None,
                sha256: None,
            },
            AssetEntry::Detailed { name, url, sha256 } => Self { name, url, sha256 },
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bound on every external process and HTTP request, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Write to the persisted user environment as well as the session.
    #[serde(skip_serializing_if = "is_false")]
    pub persist: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn default_candidate_dirs() -> Vec<PathBuf> {
    let dirs: &[&str] = if cfg!(windows) {
        &[
            r"C:\Program Files\Tesseract-OCR",
            r"C:\Program Files (x86)\Tesseract-OCR",
        ]
    } else if cfg!(target_os = "macos") {
        &["/opt/homebrew/bin", "/usr/local/bin"]
    } else {
        &["/usr/bin", "/usr/local/bin"]
    };
    dirs.iter().map(PathBuf::from).collect()
}

fn default_package_managers() -> Vec<PackageManagerConfig> {
    if cfg!(windows) {
        windows_package_managers()
    } else if cfg!(target_os = "macos") {
        vec![PackageManagerConfig::new(
            "brew",
            "brew",
            &["brew", "list", "--versions", "tesseract"],
            &["brew", "install", "tesseract"],
            &["/opt/homebrew/bin", "/usr/local/bin"],
        )]
    } else {
        vec![PackageManagerConfig::new(
            "apt-get",
            "apt-get",
            &["dpkg", "-s", "tesseract-ocr"],
            &["apt-get", "install", "-y", "tesseract-ocr"],
            &["/usr/bin"],
        )]
    }
}

fn windows_package_managers() -> Vec<PackageManagerConfig> {
    vec![
        PackageManagerConfig::new(
            "winget",
            "winget",
            &["winget", "list", "--id", "UB-Mannheim.TesseractOCR", "--exact"],
            &[
                "winget",
                "install",
                "--id",
                "UB-Mannheim.TesseractOCR",
                "--exact",
                "--silent",
                "--accept-package-agreements",
                "--accept-source-agreements",
            ],
            &[r"C:\Program Files\Tesseract-OCR"],
        ),
        PackageManagerConfig::new(
            "choco",
            "choco",
            // Plain `choco list` exits 0 even when nothing matches.
            &[
                "choco",
                "list",
                "--exact",
                "tesseract",
                "--limit-output",
                "--use-enhanced-exit-codes",
            ],
            &["choco", "install", "tesseract", "-y", "--no-progress"],
            &[r"C:\Program Files\Tesseract-OCR"],
        ),
    ]
}
