//! The shared release version.
//!
//! All workspace packages are released under one version, recorded in a
//! workspace-level version file (`lerna.json` by default).

use crate::discovery::read_json_file;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Default name of the workspace version file.
pub const DEFAULT_VERSION_FILE: &str = "lerna.json";

/// Reads the `version` field of `<root>/<file_name>`.
///
/// # Errors
///
/// Returns an I/O or JSON error if the file cannot be read, and a manifest
/// error if it has no string `version` field.
pub fn read_release_version(root: &Path, file_name: &str) -> Result<String> {
    let path = root.join(file_name);
    let document: Value = read_json_file(&path)?;

    match document.get("version") {
        Some(Value::String(version)) if !version.is_empty() => Ok(version.clone()),
        Some(Value::String(_)) => Err(Error::manifest(&path, "\"version\" is empty")),
        Some(_) => Err(Error::manifest(&path, "\"version\" must be a string")),
        None => Err(Error::manifest(&path, "missing \"version\" field")),
    }
}
