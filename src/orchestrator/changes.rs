//! Narrows a workspace down to the packages touched since the last release.
use log::*;
use std::sync::Arc;

use crate::{
    Result,
    analyzer::commit::ParsedCommit,
    path_helpers::is_within,
    vcs::{CommitRecord, VcsManager},
    workspace::{Package, Workspace},
};

pub struct ChangeSetMapper {
    vcs: Arc<VcsManager>,
}

impl ChangeSetMapper {
    pub fn new(vcs: Arc<VcsManager>) -> Self {
        Self { vcs }
    }

    /// Packages that are candidates for release, in workspace order.
    ///
    /// Single-package workspaces always yield their package. In a monorepo,
    /// an empty result or a failure to read history falls back to every
    /// package.
    pub async fn affected_packages(&self, workspace: &Workspace) -> Vec<Package> {
        if !workspace.is_monorepo() {
            return workspace.packages.clone();
        }

        match self.detect(&workspace.packages).await {
            Ok(affected) if !affected.is_empty() => {
                info!(
                    "changed packages: {}",
                    affected
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                affected
            }
            Ok(_) => {
                warn!("no changed packages detected: considering all packages");
                workspace.packages.clone()
            }
            Err(err) => {
                warn!(
                    "failed to detect changed packages: considering all packages: {err}"
                );
                workspace.packages.clone()
            }
        }
    }

    async fn detect(&self, packages: &[Package]) -> Result<Vec<Package>> {
        let since = self.vcs.latest_tag().await?;
        let files = self.vcs.get_changed_files(since.clone()).await?;
        let commits = self.vcs.get_commits(since).await?;

        Ok(map_changes(packages, &files, &commits))
    }
}

/// Packages owning at least one changed file, or named by a commit scope.
/// A scope names a package when it equals the package's name, path, or
/// directory name.
pub fn map_changes(
    packages: &[Package],
    files: &[String],
    commits: &[CommitRecord],
) -> Vec<Package> {
    let scopes = commits
        .iter()
        .filter_map(ParsedCommit::parse)
        .filter_map(|c| c.scope)
        .collect::<Vec<_>>();

    packages
        .iter()
        .filter(|package| {
            files.iter().any(|f| is_within(&package.path, f))
                || scopes.iter().any(|s| {
                    s == &package.name
                        || s == &package.path
                        || s == package.basename()
                })
        })
        .cloned()
        .collect()
}
