//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{config::PartialConfig, version::VersionFormatSetting};

/// Global CLI arguments. Options left unset fall through to the
/// configuration file and the package descriptor.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, global = true)]
    /// Path to the configuration file. Defaults to .calver-release.toml in
    /// the repository root.
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false, global = true)]
    /// Compute and preview the release without tagging or publishing.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, global = true)]
    /// Version shape: auto, three-part (YY.MM.PATCH) or four-part
    /// (YY.MM.MINOR.PATCH).
    pub version_format: Option<VersionFormatSetting>,

    #[arg(long, default_value_t = false, global = true)]
    /// Move the version to the current month when the declared version is
    /// from an earlier month.
    pub auto_update_month: bool,

    #[arg(long, global = true)]
    /// Release from this branch instead of the checked out one.
    pub branch: Option<String>,

    #[arg(long, value_delimiter = ',', global = true)]
    /// Comma separated plugin identifiers, in registration order.
    pub plugins: Option<Vec<String>>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release operation subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the full release lifecycle.
    Release,

    /// Print the next release as JSON without publishing anything.
    Next {
        #[arg(long)]
        /// Write the JSON to this file instead of stdout.
        out_file: Option<String>,
    },
}

impl Args {
    /// The configuration layer set explicitly on the command line. Flags
    /// that were not passed are left unset.
    pub fn overrides(&self) -> PartialConfig {
        let dry_run =
            self.dry_run || matches!(self.command, Command::Next { .. });

        PartialConfig {
            version_format: self.version_format,
            auto_update_month: self.auto_update_month.then_some(true),
            dry_run: dry_run.then_some(true),
            plugins: self.plugins.clone(),
            ..Default::default()
        }
    }
}
