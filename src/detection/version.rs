//! Version probe for a resolved binary.

use std::path::Path;
use std::time::Duration;

use crate::shell::{CommandRunner, Invocation};

/// Run `program` with the probe arguments and pull a version out of its
/// output.
///
/// Any failure yields `None`; the probe is informational and never affects
/// detection.
pub fn probe_version(
    program: &Path,
    args: &[String],
    runner: &dyn CommandRunner,
    timeout: Option<Duration>,
) -> Option<String> {
    let invocation = Invocation::new(program)
        .args(args.iter().cloned())
        .timeout(timeout);
    let result = runner.run(&invocation).ok()?;
    if !result.success {
        return None;
    }
    // Tesseract 3.x printed its banner on stderr.
    extract_version(&result.stdout).or_else(|| extract_version(&result.stderr))
}

/// Extract version from command output.
pub fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v?(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(m) = re.captures(output).and_then(|caps| caps.get(1)) {
                return Some(m.as_str().to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockResponse, MockRunner};

    #[test]
    fn extract_version_from_tesseract_banner() {
        let output = "tesseract 5.3.0\n leptonica-1.82.0\n  libgif 5.1.9";
        assert_eq!(extract_version(output), Some("5.3.0".to_string()));
    }

    #[test]
    fn extract_version_prefixed_v() {
        assert_eq!(
            extract_version("tesseract v5.0.0.20211201"),
            Some("5.0.0".to_string())
        );
    }

    #[test]
    fn extract_version_two_components() {
        assert_eq!(extract_version("tesseract 4.1"), Some("4.1".to_string()));
    }

    #[test]
    fn extract_version_no_match() {
        assert!(extract_version("no version here").is_none());
    }

    #[test]
    fn probe_reads_stdout() {
        let runner = MockRunner::new();
        runner.on("tesseract --version", MockResponse::output("tesseract 5.3.4\n"));
        let version = probe_version(
            Path::new("/usr/bin/tesseract"),
            &["--version".to_string()],
            &runner,
            None,
        );
        assert_eq!(version, Some("5.3.4".to_string()));
    }

    #[test]
    fn probe_failure_is_none() {
        let runner = MockRunner::new();
        runner.on("tesseract", MockResponse::exit(1));
        let version = probe_version(
            Path::new("tesseract"),
            &["--version".to_string()],
            &runner,
            None,
        );
        assert!(version.is_none());
    }
}
