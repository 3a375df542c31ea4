//! Command execution for calver-release.
//!
//! Both commands load configuration the same way and drive the release
//! lifecycle through [`crate::orchestrator::Orchestrator`]:
//!
//! - **release**: runs every stage, tagging and publishing when a release is
//!   needed
//! - **next**: forces a dry run and prints the computed release as JSON,
//!   or writes it to `--out-file`

use crate::{Result, cli};

/// Configuration loading and orchestrator setup shared by all commands.
pub mod common;

/// Full release run.
pub mod release;

/// Next release preview.
pub mod next;

pub async fn execute(args: &cli::Args) -> Result<()> {
    match &args.command {
        cli::Command::Release => release::execute(args).await,
        cli::Command::Next { out_file } => {
            next::execute(args, out_file.clone()).await
        }
    }
}
