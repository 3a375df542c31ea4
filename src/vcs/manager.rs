//! Manager that wraps version control implementations
use log::*;

use crate::{
    Result,
    vcs::{CommitRecord, Vcs},
};

pub struct VcsManager {
    vcs: Box<dyn Vcs>,
    dry_run: bool,
}

impl VcsManager {
    pub fn new(vcs: Box<dyn Vcs>, dry_run: bool) -> Self {
        Self { vcs, dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn get_commits(
        &self,
        since: Option<String>,
    ) -> Result<Vec<CommitRecord>> {
        debug!("getting commits starting from: {:?}", since);
        self.vcs.get_commits(since).await
    }

    pub async fn get_tags(&self) -> Result<Vec<String>> {
        self.vcs.get_tags().await
    }

    pub async fn get_changed_files(
        &self,
        since: Option<String>,
    ) -> Result<Vec<String>> {
        debug!("getting changed files since: {:?}", since);
        self.vcs.get_changed_files(since).await
    }

    pub async fn latest_tag(&self) -> Result<Option<String>> {
        self.vcs.latest_tag().await
    }

    pub async fn current_branch(&self) -> Result<String> {
        self.vcs.current_branch().await
    }

    pub async fn is_clean(&self) -> Result<bool> {
        self.vcs.is_clean().await
    }

    pub async fn create_tag(&self, name: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would create tag: {name}");
            return Ok(());
        }

        self.vcs.create_tag(name.to_string()).await
    }

    pub async fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would push tag {name} to {remote}");
            return Ok(());
        }

        self.vcs.push_tag(remote.to_string(), name.to_string()).await
    }

    pub async fn commit_paths(
        &self,
        paths: &[String],
        message: &str,
    ) -> Result<Option<String>> {
        if self.dry_run {
            warn!("dry_run: would commit {}: {message}", paths.join(", "));
            return Ok(None);
        }

        self.vcs
            .commit_paths(paths.to_vec(), message.to_string())
            .await
    }

    pub async fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would push {branch} to {remote}");
            return Ok(());
        }

        self.vcs
            .push_branch(remote.to_string(), branch.to_string())
            .await
    }
}
