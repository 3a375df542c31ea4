//! Release analysis: from workspace discovery to an assembled
//! [`NextRelease`].
use log::*;
use std::{path::PathBuf, sync::Arc};

use crate::{
    Result,
    analyzer::CommitClassifier,
    orchestrator::changes::ChangeSetMapper,
    plugin::{NextRelease, ReleaseRecord, RunOptions},
    vcs::VcsManager,
    version::{CalVer, VersionResolver, YearMonth, tags_for_package},
    workspace::{Package, WorkspaceResolver},
};

pub struct Core {
    vcs: Arc<VcsManager>,
    root: PathBuf,
    today: YearMonth,
    classifier: CommitClassifier,
    changes: ChangeSetMapper,
}

impl Core {
    pub fn new(vcs: Arc<VcsManager>, root: PathBuf, today: YearMonth) -> Self {
        Self {
            changes: ChangeSetMapper::new(Arc::clone(&vcs)),
            vcs,
            root,
            today,
            classifier: CommitClassifier::new(),
        }
    }

    /// Computes the release for every affected package. `None` when no
    /// package has commits that warrant a release.
    pub async fn analyze(
        &self,
        options: &RunOptions,
    ) -> Result<Option<NextRelease>> {
        let workspace = WorkspaceResolver::new(&self.root).resolve();
        let monorepo = workspace.is_monorepo();
        let candidates = self.changes.affected_packages(&workspace).await;

        let resolver = VersionResolver::new(
            options.version_format,
            options.auto_update_month,
            self.today,
        );

        let tags = self.vcs.get_tags().await?;
        let mut records = vec![];

        for package in candidates {
            if let Some(record) = self
                .analyze_package(package, monorepo, &tags, &resolver)
                .await?
            {
                records.push(record);
            }
        }

        Ok(NextRelease::new(records))
    }

    async fn analyze_package(
        &self,
        package: Package,
        monorepo: bool,
        tags: &[String],
        resolver: &VersionResolver,
    ) -> Result<Option<ReleaseRecord>> {
        let scope = monorepo.then_some(package.name.as_str());
        let package_tags = tags_for_package(tags, scope);
        let since = package_tags.first().map(|t| t.name.clone());

        debug!("{}: analyzing commits since {:?}", package.name, since);

        let commits = self.vcs.get_commits(since).await?;

        let Some(analysis) = self
            .classifier
            .classify(&commits, monorepo.then_some(&package))
        else {
            info!("{}: no release-worthy commits", package.name);
            return Ok(None);
        };

        let versions = package_tags.iter().map(|t| t.version).collect::<Vec<CalVer>>();
        let resolution = resolver.resolve(
            analysis.release_type,
            package.version.as_deref(),
            &versions,
        );

        info!(
            "{}: {} release, next version {}",
            package.name, analysis.release_type, resolution.version
        );

        Ok(Some(ReleaseRecord::new(package, resolution, analysis, monorepo)))
    }
}
