//! Workspace root location.

use crate::discovery::read_json_file;
use crate::error::{Error, Result};
use crate::manifest::MANIFEST_FILE;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Walks from `start` towards the filesystem root and returns the first
/// directory whose `package.json` declares `workspaces`.
///
/// A relative `start` is resolved against the current directory first, so
/// `.` walks up from the working directory. Directories without a
/// `package.json` are passed over.
///
/// # Errors
///
/// Returns [`Error::WorkspaceNotFound`] when no ancestor declares a
/// workspace, and a JSON or I/O error if a `package.json` on the way cannot
/// be read.
pub fn find_workspace_root(start: &Path) -> Result<PathBuf> {
    let start: PathBuf = std::path::absolute(start)
        .map_err(|e| Error::io(e, start, "resolving start directory"))?
        .components()
        .collect();

    for dir in start.ancestors() {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            continue;
        }
        let manifest: Value = read_json_file(&manifest_path)?;
        if declares_workspaces(&manifest) {
            tracing::debug!(root = %dir.display(), "Found workspace root");
            return Ok(dir.to_path_buf());
        }
    }

    Err(Error::WorkspaceNotFound { path: start })
}

/// Whether a parsed `package.json` carries a workspace declaration.
///
/// Follows JavaScript truthiness: `null`, `false`, `0` and `""` do not count.
fn declares_workspaces(manifest: &Value) -> bool {
    match manifest.get("workspaces") {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v.abs() > 0.0),
        Some(_) => true,
    }
}
