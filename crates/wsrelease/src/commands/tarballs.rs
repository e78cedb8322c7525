//! `wsrelease tarballs <release>`: the full tarball release pipeline.
//!
//! 1. point workspace dependencies at unversioned tarball URLs
//! 2. `npm pack --workspaces --pack-destination <out-dir>`
//! 3. strip `-<version>` from the produced tarball names
//! 4. set workspace dependencies back to the release version
//!
//! A failure at any step aborts the run. Manifests rewritten in step 1 are
//! then left in release form.

use super::load_workspace;
use crate::cli::UNDO;
use crate::errors::{CliError, Result};
use crate::settings::ReleaseSettings;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::instrument;
use wsrelease_workspaces::{
    ArchiveNaming, DependencyTarget, apply_target, read_release_version, release_url_prefix,
    strip_version_suffixes,
};

/// Runs the tarball pipeline for `release`.
///
/// # Errors
///
/// Returns an error if `release` is the reserved `undo`, if the workspace,
/// version file or download base cannot be resolved, if packing fails, or
/// on any I/O failure.
#[instrument(skip(settings))]
pub fn execute_tarballs(settings: &ReleaseSettings, release: &str) -> Result<String> {
    if release == UNDO {
        return Err(CliError::invalid_argument(
            "'undo' is not a release name; use 'wsrelease rewrite undo' to restore manifests",
        ));
    }

    let mut workspace = load_workspace(settings)?;
    let version = read_release_version(&workspace.root, &settings.version_file)?;
    let download_base = settings.resolve_download_base(&workspace.root)?;

    let to_release = DependencyTarget::Release {
        url_prefix: release_url_prefix(&download_base, release),
        naming: ArchiveNaming::Unversioned,
    };
    apply_target(&mut workspace.packages, &to_release)?;

    let out_dir = workspace.root.join(&settings.out_dir);
    fs::create_dir_all(&out_dir).map_err(|source| CliError::OutDir {
        path: out_dir.clone(),
        source,
    })?;
    run_packager(&settings.npm, &workspace.root, &settings.out_dir)?;

    let renames = strip_version_suffixes(&out_dir, &version)?;

    // Re-read so the restore pass starts from what is on disk.
    let mut workspace = load_workspace(settings)?;
    apply_target(
        &mut workspace.packages,
        &DependencyTarget::Normal {
            version: version.clone(),
        },
    )?;

    let out_display = settings.out_dir.display();
    let mut out = String::new();
    for rename in &renames {
        if let Some(name) = rename.to.file_name() {
            let _ = writeln!(out, "  {}", name.to_string_lossy());
        }
    }
    let _ = writeln!(out, "\ncreated tarballs for the release {release}");
    let _ = writeln!(
        out,
        "Use the following command to create a release with the gh CLI:"
    );
    let _ = write!(out, "gh release create {release} ./{out_display}/*");
    Ok(out)
}

/// Packs every workspace package into `out_dir` (relative to `root`).
fn run_packager(npm: &str, root: &Path, out_dir: &Path) -> Result<()> {
    let mut command = Command::new(npm);
    command
        .arg("pack")
        .arg("--workspaces")
        .arg("--pack-destination")
        .arg(out_dir)
        .current_dir(root);
    let command_line = format!("{npm} pack --workspaces --pack-destination {}", out_dir.display());

    tracing::info!(command = %command_line, root = %root.display(), "Running packager");
    let status = command.status().map_err(|source| CliError::PackagerSpawn {
        command: command_line.clone(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::Packaging {
            command: command_line,
            status: status.to_string(),
        })
    }
}
