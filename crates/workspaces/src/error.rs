//! Error types for workspace operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, reading, or rewriting a workspace.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No ancestor directory declares a workspace.
    #[error("No workspace root found above {path}")]
    #[diagnostic(
        code(wsrelease::workspaces::workspace_not_found),
        help(
            "Run from inside a workspace whose root package.json declares a \"workspaces\" field"
        )
    )]
    WorkspaceNotFound {
        /// The directory the search started from.
        path: PathBuf,
    },

    /// A manifest is structurally invalid (missing `name`, non-string dependency, ...).
    #[error("Invalid manifest at {path}: {message}")]
    #[diagnostic(
        code(wsrelease::workspaces::invalid_manifest),
        help("Every workspace package.json needs string \"name\" and \"version\" fields")
    )]
    Manifest {
        /// Path to the offending file.
        path: PathBuf,
        /// Description of what is invalid.
        message: String,
    },

    /// Two package directories declare the same package name.
    #[error("Duplicate package name '{name}' declared in {} and {}", first.display(), second.display())]
    #[diagnostic(
        code(wsrelease::workspaces::duplicate_package),
        help("Package names must be unique across the packages directory")
    )]
    DuplicatePackage {
        /// The package name declared twice.
        name: String,
        /// Directory of the package that was read first.
        first: PathBuf,
        /// Directory of the package that collided with it.
        second: PathBuf,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(wsrelease::workspaces::io_error),
        help(
            "Check that the referenced paths exist and that you have permission to read or write them"
        )
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(wsrelease::workspaces::json_error),
        help("Ensure the file is valid JSON")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl Error {
    /// Create a new manifest error.
    #[must_use]
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error for `operation` on `path`.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}
