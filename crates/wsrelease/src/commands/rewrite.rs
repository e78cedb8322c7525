//! `wsrelease rewrite <release>` and `wsrelease rewrite undo`.

use super::load_workspace;
use crate::errors::Result;
use crate::settings::ReleaseSettings;
use std::fmt::Write;
use tracing::instrument;
use wsrelease_workspaces::{
    ArchiveNaming, DependencyTarget, RewriteReport, apply_target, read_release_version,
    release_url_prefix,
};

/// Points every workspace dependency at the versioned tarball URL of the
/// depended-on package under `release`.
///
/// # Errors
///
/// Returns an error if the workspace cannot be located or read, if no
/// download base can be determined, or if a manifest cannot be written.
#[instrument(skip(settings))]
pub fn execute_to_release(settings: &ReleaseSettings, release: &str) -> Result<String> {
    let mut workspace = load_workspace(settings)?;
    let download_base = settings.resolve_download_base(&workspace.root)?;
    let url_prefix = release_url_prefix(&download_base, release);

    let target = DependencyTarget::Release {
        url_prefix: url_prefix.clone(),
        naming: ArchiveNaming::Versioned,
    };
    let report = apply_target(&mut workspace.packages, &target)?;

    Ok(format!(
        "Rewrote workspace dependencies for release {release}\n  URL prefix: {url_prefix}\n{}",
        render_report(&report)
    ))
}

/// Sets every workspace dependency back to the shared release version.
///
/// # Errors
///
/// Returns an error if the workspace or its version file cannot be read, or
/// if a manifest cannot be written.
#[instrument(skip(settings))]
pub fn execute_restore(settings: &ReleaseSettings) -> Result<String> {
    let mut workspace = load_workspace(settings)?;
    let version = read_release_version(&workspace.root, &settings.version_file)?;

    let report = apply_target(
        &mut workspace.packages,
        &DependencyTarget::Normal {
            version: version.clone(),
        },
    )?;

    Ok(format!(
        "Restored workspace dependencies to version {version}\n{}",
        render_report(&report)
    ))
}

/// One line per package plus a total.
pub(crate) fn render_report(report: &RewriteReport) -> String {
    let mut out = String::new();
    for package in &report.packages {
        let _ = writeln!(out, "  {} ({} changed)", package.name, package.changed);
    }
    let _ = write!(
        out,
        "{} dependencies updated across {} packages",
        report.total_changed(),
        report.packages.len()
    );
    out
}
