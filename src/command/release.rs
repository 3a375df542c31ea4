//! Full release run: verify, analyze, notes, prepare, publish.
use log::*;

use crate::{
    Result, cli, command::common, orchestrator::RunOutcome,
};

/// Execute the release lifecycle once.
pub async fn execute(args: &cli::Args) -> Result<()> {
    let orchestrator = common::setup_orchestrator(args)?;

    match orchestrator.run().await? {
        RunOutcome::NoRelease => {
            info!("releases are up-to-date: nothing to release");
        }
        RunOutcome::DryRun(next) => {
            for record in next.releases() {
                warn!(
                    "dry_run: would release {} as {}",
                    record.package().name,
                    record.tag_name()
                );
            }
        }
        RunOutcome::Released(next) => {
            for record in next.releases() {
                info!(
                    "released {} {} ({})",
                    record.package().name,
                    record.version(),
                    record.tag_name()
                );
            }
        }
    }

    Ok(())
}
