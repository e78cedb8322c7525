//! Resolved settings threaded into every command.

use crate::errors::{CliError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use wsrelease_workspaces::{MANIFEST_FILE, read_json_file};

/// Settings for one run, resolved from flags and environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    /// Directory the workspace search starts from.
    pub start_dir: PathBuf,
    /// Packages directory relative to the workspace root.
    pub packages_dir: PathBuf,
    /// Version file name relative to the workspace root.
    pub version_file: String,
    /// Explicit download base URL, if given.
    pub download_base: Option<String>,
    /// Packaging tool executable.
    pub npm: String,
    /// Tarball output directory relative to the workspace root.
    pub out_dir: PathBuf,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            packages_dir: PathBuf::from("packages"),
            version_file: wsrelease_workspaces::DEFAULT_VERSION_FILE.to_string(),
            download_base: None,
            npm: "npm".to_string(),
            out_dir: PathBuf::from("tarballs"),
        }
    }
}

impl ReleaseSettings {
    /// The download base URL: the explicit setting, or the GitHub releases
    /// download URL of the root manifest's `repository`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither source yields a URL, or
    /// a workspace error if the root manifest cannot be read.
    pub fn resolve_download_base(&self, root: &Path) -> Result<String> {
        if let Some(base) = &self.download_base {
            return Ok(base.clone());
        }

        let manifest: Value = read_json_file(&root.join(MANIFEST_FILE))?;
        let repository = match manifest.get("repository") {
            Some(Value::String(url)) => Some(url.as_str()),
            Some(Value::Object(repo)) => repo.get("url").and_then(Value::as_str),
            _ => None,
        };

        repository.and_then(github_download_base).ok_or_else(|| {
            CliError::config(
                "Could not determine the release download URL",
                "Pass --download-base (or set WSRELEASE_DOWNLOAD_BASE), or add a GitHub \"repository\" to the root package.json",
            )
        })
    }
}

/// Maps a `repository` value naming a GitHub repository to its release
/// download base, e.g. `https://github.com/owner/repo/releases/download/`.
///
/// Accepts `owner/repo`, `github:owner/repo` and http(s)/git/ssh URLs.
#[must_use]
pub fn github_download_base(repository: &str) -> Option<String> {
    let repository = repository.trim();
    let path = if let Some(rest) = repository.strip_prefix("github:") {
        rest
    } else if let Some(idx) = repository.find("github.com") {
        repository[idx + "github.com".len()..].trim_start_matches([':', '/'])
    } else if !repository.contains(':') {
        repository
    } else {
        return None;
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(format!("https://github.com/{owner}/{repo}/releases/download/"))
}
