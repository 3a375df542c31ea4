use async_trait::async_trait;
use log::*;
use std::{path::PathBuf, sync::Arc};

use crate::{
    Result,
    error::CalverError,
    plugin::{LifecycleContext, LifecycleStage, Plugin, builtin::releases},
    vcs::VcsManager,
    workspace::WorkspaceResolver,
};

/// Checks the repository is releasable and reports the analysis outcome.
pub struct CommitAnalyzerPlugin {
    vcs: Arc<VcsManager>,
    root: PathBuf,
}

impl CommitAnalyzerPlugin {
    pub fn new(vcs: Arc<VcsManager>, root: PathBuf) -> Self {
        Self { vcs, root }
    }
}

#[async_trait]
impl Plugin for CommitAnalyzerPlugin {
    fn name(&self) -> String {
        "commit-analyzer".into()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        vec![LifecycleStage::VerifyConditions, LifecycleStage::AnalyzeCommits]
    }

    async fn verify_conditions(&self, ctx: &mut LifecycleContext) -> Result<()> {
        let workspace = WorkspaceResolver::new(&self.root).resolve();
        if workspace.packages.is_empty() {
            return Err(CalverError::invalid_config("no packages found"));
        }

        if !self.vcs.is_clean().await? {
            if ctx.options().dry_run {
                warn!("working tree has uncommitted changes");
            } else {
                return Err(CalverError::vcs(
                    "working tree has uncommitted changes",
                ));
            }
        }

        Ok(())
    }

    async fn analyze_commits(&self, ctx: &mut LifecycleContext) -> Result<()> {
        for record in releases(ctx) {
            let resolution = record.resolution();
            info!(
                "{}: {} release with {} commits -> {}",
                record.package().name,
                record.analysis().release_type,
                record.analysis().release_commits.len(),
                record.version()
            );
            if resolution.auto_rolled {
                info!("{}: version moved to current month", record.package().name);
            }
            if resolution.manual_bump {
                info!(
                    "{}: declared version is out of sequence with tags, starting new month sequence",
                    record.package().name
                );
            }
        }

        Ok(())
    }
}
