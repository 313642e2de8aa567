//! Required data files.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AssetsConfig;
use crate::install::absolutize;

/// One file that must exist in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRequirement {
    /// File name inside `dest_dir`.
    pub filename: String,
    /// Where to download it from.
    pub url: String,
    /// Data directory.
    pub dest_dir: PathBuf,
    /// Expected SHA-256, lowercase hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl AssetRequirement {
    /// Full destination path.
    pub fn destination(&self) -> PathBuf {
        self.dest_dir.join(&self.filename)
    }

    /// Whether the destination file exists.
    pub fn is_present(&self) -> bool {
        self.destination().is_file()
    }

    /// Requirements for every configured file, resolved against
    /// `project_root`.
    pub fn from_config(config: &AssetsConfig, project_root: &Path) -> Vec<Self> {
        let dest_dir = absolutize(&config.dir, project_root);
        config
            .files
            .iter()
            .map(|file| Self {
                filename: file.name.clone(),
                url: file
                    .url
                    .clone()
                    .unwrap_or_else(|| join_url(&config.base_url, &file.name)),
                dest_dir: dest_dir.clone(),
                sha256: file.sha256.as_ref().map(|s| s.to_lowercase()),
            })
            .collect()
    }
}

fn join_url(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Filenames of the requirements not present on disk, in order.
pub fn missing(requirements: &[AssetRequirement]) -> Vec<String> {
    requirements
        .iter()
        .filter(|r| !r.is_present())
        .map(|r| r.filename.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetFile;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_yields_ara_and_fra_under_tessdata() {
        let reqs = AssetRequirement::from_config(&AssetsConfig::default(), Path::new("/proj"));
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].filename, "ara.traineddata");
        assert_eq!(
            reqs[0].url,
            "https://github.com/tesseract-ocr/tessdata/raw/main/ara.traineddata"
        );
        assert_eq!(reqs[1].destination(), Path::new("/proj").join("tessdata").join("fra.traineddata"));
    }

    #[test]
    fn per_file_url_and_checksum() {
        let mut config = AssetsConfig::default();
        config.base_url = "https://mirror.example/data".to_string();
        config.files = vec![
            AssetFile::named("ara.traineddata"),
            AssetFile {
                name: "fra.traineddata".to_string(),
                url: Some("https://other.example/fra".to_string()),
                sha256: Some("ABCDEF".to_string()),
            },
        ];
        let reqs = AssetRequirement::from_config(&config, Path::new("/proj"));
        assert_eq!(reqs[0].url, "https://mirror.example/data/ara.traineddata");
        assert_eq!(reqs[1].url, "https://other.example/fra");
        assert_eq!(reqs[1].sha256.as_deref(), Some("abcdef"));
    }

    #[test]
    fn missing_lists_absent_files_only() {
        let temp = TempDir::new().unwrap();
        let mut config = AssetsConfig::default();
        config.dir = temp.path().to_path_buf();
        fs::write(temp.path().join("ara.traineddata"), "model").unwrap();

        let reqs = AssetRequirement::from_config(&config, Path::new("/unused"));
        assert_eq!(missing(&reqs), vec!["fra.traineddata"]);
    }
}
