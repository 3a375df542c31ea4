//! Version control access used by the release pipeline.
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use std::cmp::Ordering;

use crate::{Result, version::parse_tag};

pub mod local;
pub mod manager;

pub use local::LocalRepo;
pub use manager::VcsManager;

/// A commit as seen by the classifier: its id and full message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub id: String,
    pub message: String,
}

/// Queries and mutations against the repository being released.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Commits reachable from HEAD, newest first. With `since`, only commits
    /// not reachable from that reference.
    async fn get_commits(
        &self,
        since: Option<String>,
    ) -> Result<Vec<CommitRecord>>;
    /// All tag names, sorted by version descending.
    async fn get_tags(&self) -> Result<Vec<String>>;
    /// Paths changed between `since` and HEAD, or every tracked path when
    /// `since` is `None`.
    async fn get_changed_files(
        &self,
        since: Option<String>,
    ) -> Result<Vec<String>>;
    /// Most recent release tag reachable from HEAD.
    async fn latest_tag(&self) -> Result<Option<String>>;
    async fn current_branch(&self) -> Result<String>;
    /// Tags HEAD with `name`.
    async fn create_tag(&self, name: String) -> Result<()>;
    async fn push_tag(&self, remote: String, name: String) -> Result<()>;
    /// Whether the working tree has no uncommitted changes to tracked files.
    async fn is_clean(&self) -> Result<bool>;
    /// Stages `paths` (relative to the working directory) and commits them
    /// on HEAD. Returns the new commit id, or `None` when the paths match
    /// HEAD and nothing was committed.
    async fn commit_paths(
        &self,
        paths: Vec<String>,
        message: String,
    ) -> Result<Option<String>>;
    /// Pushes HEAD to `branch` on `remote`.
    async fn push_branch(&self, remote: String, branch: String) -> Result<()>;
}

/// Sorts tag names newest version first. Release tags are ordered by their
/// CalVer value; any other tags follow in reverse lexical order.
pub fn sort_tags_descending(tags: &mut [String]) {
    tags.sort_by(|a, b| match (parse_tag(a), parse_tag(b)) {
        (Some(a), Some(b)) => b
            .version
            .cmp(&a.version)
            .then_with(|| b.name.cmp(&a.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_release_tags_by_version_descending() {
        let mut tags: Vec<String> = [
            "v-25.07.9",
            "nightly",
            "v-25.08.1",
            "v-25.07.10",
            "v-24.12.3-core-release",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();

        sort_tags_descending(&mut tags);

        assert_eq!(
            tags,
            vec![
                "v-25.08.1",
                "v-25.07.10",
                "v-25.07.9",
                "v-24.12.3-core-release",
                "nightly",
            ]
        );
    }
}
