//! Command line definition.

use crate::commands::Command;
use crate::settings::ReleaseSettings;
use crate::tracing::{LogLevel, TracingConfig, TracingFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Release identifier that selects the reverse rewrite.
pub const UNDO: &str = "undo";

#[derive(Parser, Debug)]
#[command(name = "wsrelease")]
#[command(
    about = "Point npm workspace dependencies at release tarballs and back again"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum,
        env = "WSRELEASE_LOG_FORMAT"
    )]
    pub format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format (same as --format json)")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Rewrite workspace dependencies to release tarball URLs, or back with 'undo'"
    )]
    Rewrite {
        #[arg(help = "Release tag used in download URLs, or 'undo' to restore versions")]
        release: String,
    },
    #[command(
        about = "Rewrite dependencies, pack every package, strip versions from tarball names, and restore"
    )]
    Tarballs {
        #[arg(help = "Release tag the tarballs will be uploaded under")]
        release: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "WSRELEASE_PATH",
        help = "Directory to start the workspace search from",
        default_value = "."
    )]
    pub path: PathBuf,

    #[arg(
        long,
        global = true,
        env = "WSRELEASE_PACKAGES_DIR",
        help = "Packages directory, relative to the workspace root",
        default_value = "packages"
    )]
    pub packages_dir: PathBuf,

    #[arg(
        long,
        global = true,
        env = "WSRELEASE_VERSION_FILE",
        help = "JSON file holding the shared release version, relative to the workspace root",
        default_value = "lerna.json"
    )]
    pub version_file: String,

    #[arg(
        long,
        global = true,
        env = "WSRELEASE_DOWNLOAD_BASE",
        help = "Base URL release tags are appended to (defaults to the GitHub releases of the root package.json repository)"
    )]
    pub download_base: Option<String>,

    #[arg(
        long,
        global = true,
        env = "WSRELEASE_NPM",
        help = "Packaging tool executable",
        default_value = "npm"
    )]
    pub npm: String,

    #[arg(
        long,
        global = true,
        env = "WSRELEASE_OUT_DIR",
        help = "Tarball output directory, relative to the workspace root",
        default_value = "tarballs"
    )]
    pub out_dir: PathBuf,
}

impl From<SettingsArgs> for ReleaseSettings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            start_dir: args.path,
            packages_dir: args.packages_dir,
            version_file: args.version_file,
            download_base: args.download_base,
            npm: args.npm,
            out_dir: args.out_dir,
        }
    }
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Rewrite { release } if release == UNDO => Self::RestoreVersions,
            Commands::Rewrite { release } => Self::RewriteToRelease { release },
            Commands::Tarballs { release } => Self::Tarballs { release },
        }
    }
}

impl Cli {
    /// Tracing configuration selected by the global flags.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: if self.json {
                TracingFormat::Json
            } else {
                self.format
            },
            level: self.level.into(),
        }
    }
}

/// Parses the process arguments, exiting with usage on error.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_undo_selects_restore() {
        let cli = Cli::try_parse_from(["wsrelease", "rewrite", "undo"]).unwrap();
        assert!(matches!(Command::from(cli.command), Command::RestoreVersions));
    }

    #[test]
    fn test_release_selects_rewrite() {
        let cli = Cli::try_parse_from(["wsrelease", "rewrite", "v0.2.0"]).unwrap();
        match Command::from(cli.command) {
            Command::RewriteToRelease { release } => assert_eq!(release, "v0.2.0"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_format_flag_selects_layer() {
        let cli = Cli::try_parse_from(["wsrelease", "rewrite", "v1", "--format", "dev"]).unwrap();
        assert_eq!(cli.tracing_config().format, TracingFormat::Dev);

        let cli = Cli::try_parse_from(["wsrelease", "--format", "pretty", "rewrite", "v1"]).unwrap();
        assert_eq!(cli.tracing_config().format, TracingFormat::Pretty);

        let cli = Cli::try_parse_from(["wsrelease", "rewrite", "v1", "--json"]).unwrap();
        assert_eq!(cli.tracing_config().format, TracingFormat::Json);

        assert!(Cli::try_parse_from(["wsrelease", "rewrite", "v1", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_missing_release_is_usage_error() {
        assert!(Cli::try_parse_from(["wsrelease", "rewrite"]).is_err());
        assert!(Cli::try_parse_from(["wsrelease", "tarballs"]).is_err());
    }

    #[test]
    fn test_global_settings_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wsrelease",
            "tarballs",
            "v1",
            "--download-base",
            "https://example.com/dl",
            "--out-dir",
            "dist",
        ])
        .unwrap();
        let settings = ReleaseSettings::from(cli.settings);
        assert_eq!(settings.download_base.as_deref(), Some("https://example.com/dl"));
        assert_eq!(settings.out_dir, PathBuf::from("dist"));
        assert_eq!(settings.npm, "npm");
    }
}
