//! Integration tests for config module public API.

use std::fs;
use std::path::PathBuf;

use tessup::assets::AssetRequirement;
use tessup::config::{find_project_root, load_config, validate, TessupConfig, CONFIG_FILE};
use tessup::install::ToolDescriptor;
use tessup::TessupError;
use tempfile::TempDir;

#[test]
fn public_api_is_accessible() {
    let config = TessupConfig::default();
    assert_eq!(config.tool.binary, "tesseract");
    assert_eq!(config.assets.env_var, "TESSDATA_PREFIX");
    validate(&config).unwrap();
}

#[test]
fn full_config_workflow() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        r#"
tool:
  candidate_dirs: [/opt/ocr/bin]
  bundled_dir: vendor/tesseract
  package_managers:
    - name: fakepm
      program: fakepm
      query: [fakepm, has, tesseract]
      install: [fakepm, add, tesseract]
      install_dirs: [/opt/fakepm/bin]
assets:
  dir: models
  base_url: https://mirror.example.test/tessdata
  files:
    - ara.traineddata
    - name: fra.traineddata
      url: https://other.example.test/fra.traineddata
      sha256: 9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08
settings:
  timeout_secs: 120
"#,
    )
    .unwrap();

    let config = load_config(temp.path(), None).unwrap();
    validate(&config).unwrap();
    assert_eq!(config.settings.timeout_secs, Some(120));

    let descriptor = ToolDescriptor::from_config(&config.tool, temp.path());
    assert_eq!(descriptor.bundled_dir, temp.path().join("vendor/tesseract"));
    assert_eq!(
        descriptor.known_dirs(),
        vec![
            temp.path().join("vendor/tesseract"),
            PathBuf::from("/opt/ocr/bin"),
            PathBuf::from("/opt/fakepm/bin"),
        ]
    );
    assert_eq!(descriptor.strategies.len(), 3);

    let reqs = AssetRequirement::from_config(&config.assets, temp.path());
    assert_eq!(reqs[0].url, "https://mirror.example.test/tessdata/ara.traineddata");
    assert_eq!(reqs[0].dest_dir, temp.path().join("models"));
    assert_eq!(reqs[1].url, "https://other.example.test/fra.traineddata");
    assert_eq!(
        reqs[1].sha256.as_deref(),
        Some("9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")
    );
}

#[test]
fn validation_collects_every_problem() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        r#"
tool:
  binary: ""
assets:
  files:
    - ara.traineddata
    - ara.traineddata
    - name: ../escape.traineddata
    - name: fra.traineddata
      sha256: not-a-checksum
"#,
    )
    .unwrap();

    let config = load_config(temp.path(), None).unwrap();
    let err = validate(&config).unwrap_err();
    let TessupError::ConfigValidationError { message } = err else {
        panic!("expected a validation error");
    };
    assert!(message.contains("binary"));
    assert!(message.contains("ara.traineddata"));
    assert!(message.contains("escape"));
    assert!(message.contains("fra.traineddata"));
}

#[test]
fn project_root_is_found_from_a_subdirectory() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(CONFIG_FILE), "").unwrap();
    let nested = temp.path().join("src/ocr");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
}
