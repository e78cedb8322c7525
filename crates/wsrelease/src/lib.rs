//! wsrelease CLI library.
//!
//! Prepares the packages of an npm workspace for release as tarball assets
//! (for example on GitHub releases). Before packing, dependencies between
//! workspace packages are pointed at each other's tarball download URLs so
//! the tarballs install without a registry; afterwards they are set back to
//! the shared release version.
//!
//! # Commands
//!
//! - `wsrelease rewrite <release>` - rewrite dependencies to versioned tarball URLs
//! - `wsrelease rewrite undo` - restore dependencies to the release version
//! - `wsrelease tarballs <release>` - rewrite, `npm pack`, rename tarballs, restore
//!
//! The binary in `main.rs` parses arguments, initialises tracing and prints
//! whatever the selected command returns.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod errors;
pub mod settings;
pub mod tracing;

pub use commands::{Command, execute};
pub use errors::{CliError, Result};
pub use settings::ReleaseSettings;
