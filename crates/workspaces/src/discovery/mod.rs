//! Workspace package enumeration.
//!
//! Packages live one level below a packages directory (conventionally
//! `<root>/packages`). Each subdirectory holding a `package.json` is a
//! workspace package; subdirectories without one are skipped.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wsrelease_workspaces::{discover_packages, find_workspace_root};
//! use std::path::Path;
//!
//! let root = find_workspace_root(Path::new("."))?;
//! let packages = discover_packages(&root.join("packages"))?;
//! for (name, entry) in packages.iter() {
//!     println!("{name} at {}", entry.directory.display());
//! }
//! ```

use crate::error::{Error, Result};
use crate::manifest::{MANIFEST_FILE, PackageManifest};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

/// One package of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageEntry {
    /// Directory containing the package's `package.json`.
    pub directory: PathBuf,
    /// The parsed manifest.
    pub manifest: PackageManifest,
}

impl PackageEntry {
    /// Path of this package's manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.directory.join(MANIFEST_FILE)
    }
}

/// Workspace packages keyed by declared package name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspacePackages {
    entries: BTreeMap<String, PackageEntry>,
}

impl WorkspacePackages {
    /// Adds a package, rejecting a name that is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePackage`] if another package already
    /// declares the same name.
    pub fn insert(&mut self, entry: PackageEntry) -> Result<()> {
        match self.entries.entry(entry.manifest.name.clone()) {
            Entry::Occupied(existing) => Err(Error::DuplicatePackage {
                name: existing.key().clone(),
                first: existing.get().directory.clone(),
                second: entry.directory,
            }),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Looks up a package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.entries.get(name)
    }

    /// Whether a package with this name belongs to the workspace.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the workspace has no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates packages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Iterates packages mutably in name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PackageEntry)> {
        self.entries
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Package names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consumes the mapping, yielding entries in name order.
    #[must_use]
    pub fn into_entries(self) -> Vec<PackageEntry> {
        self.entries.into_values().collect()
    }
}

/// Enumerates the packages directly below `packages_dir`.
///
/// Symlinks are not followed and non-directory entries are ignored, as are
/// directories without a `package.json`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed, if a manifest cannot
/// be read or parsed, or if two packages declare the same name.
pub fn discover_packages(packages_dir: &Path) -> Result<WorkspacePackages> {
    let read_dir = fs::read_dir(packages_dir)
        .map_err(|e| Error::io(e, packages_dir, "listing packages directory"))?;

    let mut dirs = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(e, packages_dir, "listing packages directory"))?;
        let file_type = entry
            .file_type()
            .map_err(|e| Error::io(e, entry.path(), "inspecting package directory"))?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        }
    }
    // Deterministic order, so a duplicate always reports the same pair.
    dirs.sort();

    let mut packages = WorkspacePackages::default();
    for dir in dirs {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            tracing::debug!(dir = %dir.display(), "Skipping directory without package.json");
            continue;
        }
        let manifest = PackageManifest::read(&manifest_path)?;
        tracing::debug!(name = %manifest.name, dir = %dir.display(), "Discovered package");
        packages.insert(PackageEntry {
            directory: dir,
            manifest,
        })?;
    }

    tracing::info!(
        count = packages.len(),
        dir = %packages_dir.display(),
        "Enumerated workspace packages"
    );
    Ok(packages)
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed as valid JSON.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::Io {
        source: e,
        path: Some(path.to_path_buf()),
        operation: "reading json file".to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| Error::Json {
        source: e,
        path: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package(root: &Path, dir: &str, name: &str) {
        let pkg_dir = root.join(dir);
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(
            pkg_dir.join(MANIFEST_FILE),
            format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#),
        )
        .unwrap();
    }

    #[test]
    fn test_discover_packages_basic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_package(root, "a", "@scope/a");
        write_package(root, "b", "b");

        let packages = discover_packages(root).unwrap();

        assert_eq!(packages.len(), 2);
        assert!(packages.contains("@scope/a"));
        assert!(packages.contains("b"));
        assert!(packages.get("b").unwrap().directory.ends_with("b"));
        assert_eq!(packages.names().collect::<Vec<_>>(), ["@scope/a", "b"]);
    }

    #[test]
    fn test_discover_packages_skips_dirs_without_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_package(root, "a", "a");
        fs::create_dir_all(root.join("docs")).unwrap();

        let packages = discover_packages(root).unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_discover_packages_ignores_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_package(root, "a", "a");
        fs::write(root.join("README.md"), "# packages").unwrap();

        let packages = discover_packages(root).unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_discover_packages_rejects_duplicate_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_package(root, "a", "same");
        write_package(root, "b", "same");

        let err = discover_packages(root).unwrap_err();
        match err {
            Error::DuplicatePackage {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "same");
                assert!(first.ends_with("a"));
                assert!(second.ends_with("b"));
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_discover_packages_invalid_manifest_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_package(root, "a", "a");
        fs::create_dir_all(root.join("broken")).unwrap();
        fs::write(root.join("broken").join(MANIFEST_FILE), "{ not json").unwrap();

        assert!(discover_packages(root).is_err());
    }

    #[test]
    fn test_discover_packages_missing_dir() {
        let err = discover_packages(Path::new("/nonexistent/packages")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_discover_packages_empty() {
        let temp_dir = TempDir::new().unwrap();
        let packages = discover_packages(temp_dir.path()).unwrap();
        assert!(packages.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_packages_does_not_follow_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let outside = TempDir::new().unwrap();
        write_package(outside.path(), "linked", "linked");
        std::os::unix::fs::symlink(outside.path().join("linked"), root.join("linked")).unwrap();

        let packages = discover_packages(root).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_insert_keeps_first_on_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        write_package(temp_dir.path(), "x", "x");
        let manifest = PackageManifest::read(&temp_dir.path().join("x").join(MANIFEST_FILE)).unwrap();

        let mut packages = WorkspacePackages::default();
        packages
            .insert(PackageEntry {
                directory: PathBuf::from("first"),
                manifest: manifest.clone(),
            })
            .unwrap();
        assert!(
            packages
                .insert(PackageEntry {
                    directory: PathBuf::from("second"),
                    manifest,
                })
                .is_err()
        );
        assert_eq!(packages.get("x").unwrap().directory, PathBuf::from("first"));
    }

    #[test]
    fn test_read_json_file_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.json");
        fs::write(&file, r#"{"invalid json"#).unwrap();

        let result: Result<serde_json::Value> = read_json_file(&file);
        assert!(matches!(result, Err(Error::Json { .. })));
    }

    #[test]
    fn test_read_json_file_missing() {
        let result: Result<serde_json::Value> = read_json_file(Path::new("/nonexistent/file.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
