//! Command implementations.
//!
//! Each command returns the text to print on success; the binary decides
//! where it goes.

pub mod rewrite;
pub mod tarballs;

use crate::errors::Result;
use crate::settings::ReleaseSettings;
use std::path::PathBuf;
use wsrelease_workspaces::{WorkspacePackages, discover_packages, find_workspace_root};

/// A parsed command ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Point workspace dependencies at versioned release tarball URLs.
    RewriteToRelease {
        /// Release tag used in download URLs.
        release: String,
    },
    /// Set workspace dependencies back to the shared release version.
    RestoreVersions,
    /// Run the whole tarball release pipeline.
    Tarballs {
        /// Release tag used in download URLs.
        release: String,
    },
}

/// Executes `command` with `settings`.
///
/// # Errors
///
/// Propagates the first error of the command; nothing is retried.
pub fn execute(command: Command, settings: &ReleaseSettings) -> Result<String> {
    match command {
        Command::RewriteToRelease { release } => rewrite::execute_to_release(settings, &release),
        Command::RestoreVersions => rewrite::execute_restore(settings),
        Command::Tarballs { release } => tarballs::execute_tarballs(settings, &release),
    }
}

/// The located workspace with its freshly read packages.
#[derive(Debug)]
pub(crate) struct LoadedWorkspace {
    pub root: PathBuf,
    pub packages: WorkspacePackages,
}

/// Locates the workspace root from the configured start directory and
/// enumerates its packages.
pub(crate) fn load_workspace(settings: &ReleaseSettings) -> Result<LoadedWorkspace> {
    let root = find_workspace_root(&settings.start_dir)?;
    let packages = discover_packages(&root.join(&settings.packages_dir))?;
    tracing::debug!(root = %root.display(), packages = packages.len(), "Loaded workspace");
    Ok(LoadedWorkspace { root, packages })
}
