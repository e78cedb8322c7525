//! Workspace discovery and inter-package dependency rewriting for npm-style
//! tarball releases.
//!
//! A release publishes one `npm pack` tarball per workspace package as a
//! downloadable asset. For the tarballs to install without a registry,
//! dependencies between workspace packages must point at each other's asset
//! URLs while packing, and be restored to plain versions afterwards.
//!
//! # Architecture
//!
//! - [`locate`] - walks up from a directory to the workspace root
//! - [`discovery`] - enumerates the packages below the packages directory
//! - [`manifest`] - typed, order-preserving `package.json` records
//! - [`rewrite`] - rewrites workspace dependencies and persists manifests
//! - [`archive`] - archive naming and the post-pack rename pass
//! - [`version`] - reads the shared release version
//!
//! # Example
//!
//! ```rust,ignore
//! use wsrelease_workspaces::{
//!     ArchiveNaming, DependencyTarget, apply_target, discover_packages, find_workspace_root,
//!     release_url_prefix,
//! };
//! use std::path::Path;
//!
//! let root = find_workspace_root(Path::new("."))?;
//! let mut packages = discover_packages(&root.join("packages"))?;
//! let target = DependencyTarget::Release {
//!     url_prefix: release_url_prefix("https://github.com/owner/repo/releases/download/", "v1"),
//!     naming: ArchiveNaming::Versioned,
//! };
//! let report = apply_target(&mut packages, &target)?;
//! println!("rewrote {} dependencies", report.total_changed());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod archive;
pub mod discovery;
pub mod error;
pub mod locate;
pub mod manifest;
pub mod rewrite;
pub mod version;

pub use archive::{
    ARCHIVE_EXTENSION, ArchiveNaming, ArchiveRename, archive_name, sanitize,
    strip_version_suffixes,
};
pub use discovery::{PackageEntry, WorkspacePackages, discover_packages, read_json_file};
pub use error::{Error, Result};
pub use locate::find_workspace_root;
pub use manifest::{DependencyKind, DependencyMap, MANIFEST_FILE, PackageManifest};
pub use rewrite::{
    DependencyTarget, PackageRewrite, RewriteReport, apply_target, compute_targets,
    release_url_prefix, rewrite_manifest, rewrite_workspace,
};
pub use version::{DEFAULT_VERSION_FILE, read_release_version};
