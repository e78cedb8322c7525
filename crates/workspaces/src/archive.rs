//! Release archive naming and the post-pack rename pass.
//!
//! `npm pack` names each tarball `<sanitized name>-<version>.tgz`. Release
//! assets are uploaded without the version segment so that download URLs
//! stay stable across versions:
//!
//! - [`ArchiveNaming::Versioned`] - the name the packaging tool produces
//! - [`ArchiveNaming::Unversioned`] - the name after [`strip_version_suffixes`]

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of packed archives.
pub const ARCHIVE_EXTENSION: &str = "tgz";

/// Which stage of the release pipeline an archive name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveNaming {
    /// `name-version.tgz`, as produced by the packaging tool.
    #[default]
    Versioned,
    /// `name.tgz`, after the version segment has been stripped.
    Unversioned,
}

/// Makes a package name safe for use as a file name: `@` is dropped and `/`
/// becomes `-`.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.replace('@', "").replace('/', "-")
}

/// Archive file name for a package.
///
/// ```
/// use wsrelease_workspaces::archive::{ArchiveNaming, archive_name};
///
/// assert_eq!(
///     archive_name("@scope/pkg-name", "1.2.3", ArchiveNaming::Versioned),
///     "scope-pkg-name-1.2.3.tgz"
/// );
/// assert_eq!(
///     archive_name("@scope/pkg-name", "1.2.3", ArchiveNaming::Unversioned),
///     "scope-pkg-name.tgz"
/// );
/// ```
#[must_use]
pub fn archive_name(name: &str, version: &str, naming: ArchiveNaming) -> String {
    match naming {
        ArchiveNaming::Versioned => format!("{}-{version}.{ARCHIVE_EXTENSION}", sanitize(name)),
        ArchiveNaming::Unversioned => format!("{}.{ARCHIVE_EXTENSION}", sanitize(name)),
    }
}

/// A single rename performed by [`strip_version_suffixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRename {
    /// Original path, with the version segment.
    pub from: PathBuf,
    /// New path, without it.
    pub to: PathBuf,
}

/// Renames every `*-<version>.tgz` file in `dir` to `*.tgz`.
///
/// Files that do not carry the suffix are left alone, so running the pass
/// again over already-renamed archives does nothing.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a rename fails.
/// Renames that already happened are not undone.
pub fn strip_version_suffixes(dir: &Path, version: &str) -> Result<Vec<ArchiveRename>> {
    let suffix = format!("-{version}.{ARCHIVE_EXTENSION}");
    let read_dir = fs::read_dir(dir).map_err(|e| Error::io(e, dir, "listing archives"))?;

    let mut candidates = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(e, dir, "listing archives"))?;
        let file_type = entry
            .file_type()
            .map_err(|e| Error::io(e, entry.path(), "inspecting archive"))?;
        if !file_type.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if let Some(stem) = file_name.strip_suffix(&suffix) {
            if !stem.is_empty() {
                candidates.push((file_name.clone(), format!("{stem}.{ARCHIVE_EXTENSION}")));
            }
        }
    }
    candidates.sort();

    let mut renames = Vec::with_capacity(candidates.len());
    for (old, new) in candidates {
        let from = dir.join(&old);
        let to = dir.join(&new);
        fs::rename(&from, &to).map_err(|e| Error::io(e, &from, "renaming archive"))?;
        tracing::debug!(from = %old, to = %new, "Renamed archive");
        renames.push(ArchiveRename { from, to });
    }

    tracing::info!(count = renames.len(), dir = %dir.display(), "Stripped archive version suffixes");
    Ok(renames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("@scope/pkg-name"), "scope-pkg-name");
        assert_eq!(sanitize("plain"), "plain");
        assert_eq!(sanitize("a/b/c"), "a-b-c");
    }

    #[test]
    fn test_archive_name_versioned() {
        assert_eq!(
            archive_name("@scope/pkg-name", "1.2.3", ArchiveNaming::Versioned),
            "scope-pkg-name-1.2.3.tgz"
        );
    }

    #[test]
    fn test_archive_name_unversioned() {
        assert_eq!(
            archive_name("@scope/pkg-name", "1.2.3", ArchiveNaming::Unversioned),
            "scope-pkg-name.tgz"
        );
    }

    #[test]
    fn test_strip_version_suffixes() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("scope-pkg-name-1.2.3.tgz"), "a").unwrap();
        fs::write(dir.join("other-1.2.4.tgz"), "b").unwrap();
        fs::write(dir.join("notes.txt"), "c").unwrap();

        let renames = strip_version_suffixes(dir, "1.2.3").unwrap();

        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].to, dir.join("scope-pkg-name.tgz"));
        assert!(dir.join("scope-pkg-name.tgz").exists());
        assert!(!dir.join("scope-pkg-name-1.2.3.tgz").exists());
        assert!(dir.join("other-1.2.4.tgz").exists());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_strip_version_suffixes_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("a-0.1.0.tgz"), "a").unwrap();

        assert_eq!(strip_version_suffixes(dir, "0.1.0").unwrap().len(), 1);
        assert!(strip_version_suffixes(dir, "0.1.0").unwrap().is_empty());
        assert!(dir.join("a.tgz").exists());
    }

    #[test]
    fn test_strip_version_suffixes_only_trailing_segment() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("a-1.0.0.tgz.bak"), "a").unwrap();

        assert!(strip_version_suffixes(dir, "1.0.0").unwrap().is_empty());
        assert!(dir.join("a-1.0.0.tgz.bak").exists());
    }

    #[test]
    fn test_strip_version_suffixes_ignores_directories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::create_dir(dir.join("nested-1.0.0.tgz")).unwrap();

        assert!(strip_version_suffixes(dir, "1.0.0").unwrap().is_empty());
    }

    #[test]
    fn test_strip_version_suffixes_missing_dir() {
        let err = strip_version_suffixes(Path::new("/nonexistent/tarballs"), "1.0.0").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
