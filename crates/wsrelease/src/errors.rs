//! CLI-specific error types rendered through miette.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors raised by the CLI layer on top of workspace errors.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// A command line argument has a value the command cannot accept.
    #[error("Invalid argument: {argument}")]
    #[diagnostic(
        code(wsrelease::cli::invalid_argument),
        help("Run 'wsrelease --help' to see available options")
    )]
    InvalidArgument {
        /// What was wrong with the argument.
        argument: String,
    },

    /// Settings could not be resolved.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(wsrelease::cli::config), help("{help}"))]
    Config {
        /// The error message.
        message: String,
        /// Help text for the user.
        help: String,
    },

    /// The packaging tool could not be started.
    #[error("Failed to run packaging command `{command}`")]
    #[diagnostic(
        code(wsrelease::cli::packager_spawn),
        help(
            "Check that npm is installed or pass --npm. Manifests are still in release form; run 'wsrelease rewrite undo' to restore them"
        )
    )]
    PackagerSpawn {
        /// The command line that was attempted.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging tool exited unsuccessfully.
    #[error("Packaging command `{command}` failed with {status}")]
    #[diagnostic(
        code(wsrelease::cli::packaging_failed),
        help("Manifests are still in release form; run 'wsrelease rewrite undo' to restore them")
    )]
    Packaging {
        /// The command line that failed.
        command: String,
        /// Exit status description.
        status: String,
    },

    /// The archive output directory could not be created.
    #[error("Failed to create archive directory {}", path.display())]
    #[diagnostic(code(wsrelease::cli::out_dir))]
    OutDir {
        /// The directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Error from workspace discovery or rewriting.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Workspace(#[from] wsrelease_workspaces::Error),
}

impl CliError {
    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }
}
