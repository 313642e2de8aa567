//! Built-in HTTPS download.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::checksum;
use super::fetcher::Fetcher;
use super::requirement::AssetRequirement;

/// Downloads assets over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher. `None` means no overall request deadline.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tessup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Download `url` into `dest`, going through `<dest>.part`.
    pub fn download(&self, url: &str, dest: &Path, sha256: Option<&str>) -> Result<u64> {
        let part = part_path(dest);
        let result = self.download_to(url, &part).and_then(|bytes| {
            let name = dest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            checksum::verify(&part, &name, sha256)?;
            fs::rename(&part, dest)
                .with_context(|| format!("Failed to move download into {}", dest.display()))?;
            Ok(bytes)
        });
        if result.is_err() {
            let _ = fs::remove_file(&part);
        }
        result
    }

    fn download_to(&self, url: &str, part: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        let file = File::create(part)
            .with_context(|| format!("Failed to create {}", part.display()))?;
        let mut writer = BufWriter::new(file);
        let bytes = io::copy(&mut response, &mut writer)
            .with_context(|| format!("Download of {} was interrupted", url))?;
        writer.flush()?;
        tracing::debug!("Downloaded {} bytes from {}", bytes, url);
        Ok(bytes)
    }
}

/// Temporary download path for `dest`.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

impl Fetcher for HttpFetcher {
    fn describe(&self) -> String {
        "https download".to_string()
    }

    fn fetch(&self, requirement: &AssetRequirement) -> Result<()> {
        self.download(
            &requirement.url,
            &requirement.destination(),
            requirement.sha256.as_deref(),
        )
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn requirement(server: &MockServer, dir: &Path, name: &str) -> AssetRequirement {
        AssetRequirement {
            filename: name.to_string(),
            url: server.url(format!("/{}", name)),
            dest_dir: dir.to_path_buf(),
            sha256: None,
        }
    }

    #[test]
    fn downloads_into_place() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ara.traineddata");
            then.status(200).body("arabic model");
        });
        let temp = TempDir::new().unwrap();
        let req = requirement(&server, temp.path(), "ara.traineddata");

        HttpFetcher::new(None).unwrap().fetch(&req).unwrap();

        mock.assert();
        assert_eq!(
            fs::read_to_string(temp.path().join("ara.traineddata")).unwrap(),
            "arabic model"
        );
        assert!(!temp.path().join("ara.traineddata.part").exists());
    }

    #[test]
    fn http_error_leaves_no_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fra.traineddata");
            then.status(404).body("Not Found");
        });
        let temp = TempDir::new().unwrap();
        let req = requirement(&server, temp.path(), "fra.traineddata");

        let err = HttpFetcher::new(None).unwrap().fetch(&req).unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!temp.path().join("fra.traineddata").exists());
        assert!(!temp.path().join("fra.traineddata.part").exists());
    }

    #[test]
    fn checksum_mismatch_discards_download() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fra.traineddata");
            then.status(200).body("corrupted");
        });
        let temp = TempDir::new().unwrap();
        let mut req = requirement(&server, temp.path(), "fra.traineddata");
        req.sha256 = Some("0".repeat(64));

        let err = HttpFetcher::new(None).unwrap().fetch(&req).unwrap_err();

        assert!(err.to_string().contains("Checksum mismatch"));
        assert!(!temp.path().join("fra.traineddata").exists());
        assert!(!temp.path().join("fra.traineddata.part").exists());
    }

    #[test]
    fn checksum_match_keeps_download() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/eng.traineddata");
            then.status(200).body("hello");
        });
        let temp = TempDir::new().unwrap();
        let mut req = requirement(&server, temp.path(), "eng.traineddata");
        req.sha256 =
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824".to_string());

        HttpFetcher::new(None).unwrap().fetch(&req).unwrap();
        assert!(temp.path().join("eng.traineddata").is_file());
    }

    #[test]
    fn keeps_timeout() {
        let fetcher = HttpFetcher::new(Some(Duration::from_secs(60))).unwrap();
        assert_eq!(fetcher.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/d/ara.traineddata")),
            PathBuf::from("/d/ara.traineddata.part")
        );
    }
}
