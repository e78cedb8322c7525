//! Inter-package dependency rewriting.
//!
//! Before packing, every dependency on another workspace package is pointed
//! at the release archive of that package; afterwards the same entries are
//! set back to the shared release version. Dependencies on packages outside
//! the workspace are never touched.

use crate::archive::{ArchiveNaming, archive_name};
use crate::discovery::{PackageEntry, WorkspacePackages};
use crate::error::Result;
use crate::manifest::{DependencyKind, PackageManifest};
use std::collections::HashMap;
use std::path::PathBuf;

/// The value every workspace dependency is rewritten to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    /// Download URL of the dependency's release archive.
    Release {
        /// Base URL the archive name is appended to, ending in `/`.
        url_prefix: String,
        /// Whether archive names carry the version segment.
        naming: ArchiveNaming,
    },
    /// The shared release version.
    Normal {
        /// Version written for every workspace dependency.
        version: String,
    },
}

impl DependencyTarget {
    /// The specifier a dependency on `manifest`'s package is rewritten to.
    #[must_use]
    pub fn value_for(&self, manifest: &PackageManifest) -> String {
        match self {
            Self::Release { url_prefix, naming } => format!(
                "{url_prefix}{}",
                archive_name(&manifest.name, &manifest.version, *naming)
            ),
            Self::Normal { version } => version.clone(),
        }
    }
}

/// Builds the download URL prefix for a release from a base such as
/// `https://github.com/owner/repo/releases/download/`.
#[must_use]
pub fn release_url_prefix(download_base: &str, release: &str) -> String {
    format!("{}/{release}/", download_base.trim_end_matches('/'))
}

/// Outcome of rewriting one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRewrite {
    /// Package name.
    pub name: String,
    /// Manifest that was written.
    pub manifest_path: PathBuf,
    /// Number of dependency entries whose value changed.
    pub changed: usize,
}

/// Outcome of a full rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// One record per package, in name order.
    pub packages: Vec<PackageRewrite>,
}

impl RewriteReport {
    /// Total number of dependency entries changed.
    #[must_use]
    pub fn total_changed(&self) -> usize {
        self.packages.iter().map(|p| p.changed).sum()
    }
}

/// Rewrites workspace dependencies of a single manifest in memory.
///
/// Every entry in `dependencies`, `devDependencies` and `peerDependencies`
/// whose key is in `targets` gets that value. Returns how many entries
/// actually changed.
pub fn rewrite_manifest<S: std::hash::BuildHasher>(
    manifest: &mut PackageManifest,
    targets: &HashMap<String, String, S>,
) -> usize {
    let mut changed = 0;
    for kind in DependencyKind::ALL {
        let Some(deps) = manifest.dependency_map_mut(kind) else {
            continue;
        };
        for (dep, spec) in deps.iter_mut() {
            if let Some(target) = targets.get(dep) {
                if *spec != *target {
                    spec.clone_from(target);
                    changed += 1;
                }
            }
        }
    }
    changed
}

/// Computes the target value of every workspace package.
pub fn compute_targets<F>(packages: &WorkspacePackages, target_fn: F) -> HashMap<String, String>
where
    F: Fn(&PackageEntry) -> String,
{
    packages
        .iter()
        .map(|(name, entry)| (name.to_string(), target_fn(entry)))
        .collect()
}

/// Rewrites every package's workspace dependencies to `target_fn` of the
/// depended-on package and writes all manifests back.
///
/// Targets are computed from the manifests as read, before any of them is
/// modified. Every manifest is written, including ones with nothing to
/// rewrite, so output formatting is uniform.
///
/// # Errors
///
/// Returns the first write error. Manifests written before the failure are
/// not restored.
pub fn rewrite_workspace<F>(packages: &mut WorkspacePackages, target_fn: F) -> Result<RewriteReport>
where
    F: Fn(&PackageEntry) -> String,
{
    let targets = compute_targets(packages, target_fn);

    let mut report = RewriteReport::default();
    for (name, entry) in packages.iter_mut() {
        let changed = rewrite_manifest(&mut entry.manifest, &targets);
        let manifest_path = entry.manifest_path();
        entry.manifest.write(&manifest_path)?;
        tracing::debug!(package = name, changed, "Rewrote manifest");
        report.packages.push(PackageRewrite {
            name: name.to_string(),
            manifest_path,
            changed,
        });
    }

    tracing::info!(
        packages = report.packages.len(),
        changed = report.total_changed(),
        "Rewrote workspace dependencies"
    );
    Ok(report)
}

/// Applies a [`DependencyTarget`] to the whole workspace.
///
/// # Errors
///
/// See [`rewrite_workspace`].
pub fn apply_target(packages: &mut WorkspacePackages, target: &DependencyTarget) -> Result<RewriteReport> {
    rewrite_workspace(packages, |entry| target.value_for(&entry.manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::parse(json, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_value_for_release() {
        let target = DependencyTarget::Release {
            url_prefix: "https://example.com/dl/v1/".to_string(),
            naming: ArchiveNaming::Versioned,
        };
        let m = manifest(r#"{"name": "@s/lib", "version": "0.3.0"}"#);
        assert_eq!(target.value_for(&m), "https://example.com/dl/v1/s-lib-0.3.0.tgz");
    }

    #[test]
    fn test_value_for_release_unversioned() {
        let target = DependencyTarget::Release {
            url_prefix: "https://example.com/dl/v1/".to_string(),
            naming: ArchiveNaming::Unversioned,
        };
        let m = manifest(r#"{"name": "@s/lib", "version": "0.3.0"}"#);
        assert_eq!(target.value_for(&m), "https://example.com/dl/v1/s-lib.tgz");
    }

    #[test]
    fn test_value_for_normal() {
        let target = DependencyTarget::Normal {
            version: "1.11.1".to_string(),
        };
        let m = manifest(r#"{"name": "x", "version": "0.0.1"}"#);
        assert_eq!(target.value_for(&m), "1.11.1");
    }

    #[test]
    fn test_release_url_prefix() {
        assert_eq!(
            release_url_prefix("https://github.com/o/r/releases/download/", "v2"),
            "https://github.com/o/r/releases/download/v2/"
        );
        assert_eq!(
            release_url_prefix("https://github.com/o/r/releases/download", "v2"),
            "https://github.com/o/r/releases/download/v2/"
        );
    }

    #[test]
    fn test_rewrite_manifest_only_workspace_keys() {
        let mut m = manifest(
            r#"{
                "name": "app",
                "version": "1.0.0",
                "dependencies": {"lib": "^1.0.0", "lodash": "^4.0.0"},
                "devDependencies": {"lib": "^1.0.0"},
                "peerDependencies": {"core": "*"}
            }"#,
        );
        let targets = HashMap::from([
            ("lib".to_string(), "URL-LIB".to_string()),
            ("core".to_string(), "URL-CORE".to_string()),
        ]);

        let changed = rewrite_manifest(&mut m, &targets);

        assert_eq!(changed, 3);
        let deps = m.dependencies.as_ref().unwrap();
        assert_eq!(deps["lib"], "URL-LIB");
        assert_eq!(deps["lodash"], "^4.0.0");
        assert_eq!(m.dev_dependencies.as_ref().unwrap()["lib"], "URL-LIB");
        assert_eq!(m.peer_dependencies.as_ref().unwrap()["core"], "URL-CORE");
    }

    #[test]
    fn test_rewrite_manifest_counts_only_changes() {
        let mut m = manifest(r#"{"name": "app", "version": "1.0.0", "dependencies": {"lib": "2.0.0"}}"#);
        let targets = HashMap::from([("lib".to_string(), "2.0.0".to_string())]);
        assert_eq!(rewrite_manifest(&mut m, &targets), 0);
    }

    #[test]
    fn test_rewrite_manifest_without_dependency_fields() {
        let mut m = manifest(r#"{"name": "leaf", "version": "1.0.0"}"#);
        let targets = HashMap::from([("lib".to_string(), "x".to_string())]);
        assert_eq!(rewrite_manifest(&mut m, &targets), 0);
        assert!(m.dependencies.is_none());
    }
}
