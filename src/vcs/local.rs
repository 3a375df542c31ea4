//! Local git repository backed by libgit2.
use async_trait::async_trait;
use color_eyre::eyre::OptionExt;
use git2::{Sort, StatusOptions};
use log::*;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{process::Command, sync::Mutex};

use crate::{
    Result,
    error::CalverError,
    vcs::{CommitRecord, Vcs, sort_tags_descending},
    version::parse_tag,
};

pub struct LocalRepo {
    workdir: PathBuf,
    repo: Arc<Mutex<git2::Repository>>,
}

impl LocalRepo {
    /// Opens the repository containing `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let repo = git2::Repository::discover(path.as_ref())?;

        let workdir = repo
            .workdir()
            .ok_or_eyre("bare repositories are not supported")?
            .to_path_buf();

        Ok(Self {
            workdir,
            repo: Arc::new(Mutex::new(repo)),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn git_push(&self, remote: &str, refspec: &str) -> Result<()> {
        let output = Command::new("git")
            .arg("push")
            .arg(remote)
            .arg(refspec)
            .current_dir(&self.workdir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CalverError::vcs(format!(
                "failed to push {refspec} to {remote}: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Vcs for LocalRepo {
    async fn get_commits(
        &self,
        since: Option<String>,
    ) -> Result<Vec<CommitRecord>> {
        let repo = self.repo.lock().await;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;

        if let Some(since) = since {
            revwalk.push_range(&format!("{since}..HEAD"))?;
        } else {
            revwalk.push_head()?;
        }

        let mut commits = vec![];

        for id in revwalk {
            let commit = repo.find_commit(id?)?;
            commits.push(CommitRecord {
                id: commit.id().to_string(),
                message: commit.message().unwrap_or("").to_string(),
            });
        }

        debug!("found {} commits", commits.len());

        Ok(commits)
    }

    async fn get_tags(&self) -> Result<Vec<String>> {
        let repo = self.repo.lock().await;

        let mut tags: Vec<String> = repo
            .tag_names(None)?
            .iter()
            .flatten()
            .map(|t| t.to_string())
            .collect();

        sort_tags_descending(&mut tags);

        Ok(tags)
    }

    async fn get_changed_files(
        &self,
        since: Option<String>,
    ) -> Result<Vec<String>> {
        let repo = self.repo.lock().await;

        let Some(since) = since else {
            let index = repo.index()?;
            return Ok(index
                .iter()
                .map(|entry| String::from_utf8_lossy(&entry.path).to_string())
                .collect());
        };

        let old_tree = repo.revparse_single(&since)?.peel_to_tree()?;
        let new_tree = repo.head()?.peel_to_tree()?;

        let diff = repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        let mut files = vec![];
        for delta in diff.deltas() {
            for path in [delta.old_file().path(), delta.new_file().path()]
                .into_iter()
                .flatten()
            {
                let path = path.to_string_lossy().replace('\\', "/");
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }

    async fn latest_tag(&self) -> Result<Option<String>> {
        let repo = self.repo.lock().await;

        let mut tagged: HashMap<git2::Oid, Vec<String>> = HashMap::new();

        for name in repo.tag_names(None)?.iter().flatten() {
            if parse_tag(name).is_none() {
                continue;
            }

            let reference = repo.find_reference(&format!("refs/tags/{name}"))?;
            let commit = reference.peel_to_commit()?;

            tagged.entry(commit.id()).or_default().push(name.to_string());
        }

        if tagged.is_empty() {
            return Ok(None);
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;
        revwalk.push_head()?;

        for id in revwalk {
            if let Some(names) = tagged.get_mut(&id?) {
                sort_tags_descending(names);
                return Ok(names.first().cloned());
            }
        }

        Ok(None)
    }

    async fn current_branch(&self) -> Result<String> {
        let repo = self.repo.lock().await;
        let head = repo.head()?;

        let branch = head
            .shorthand()
            .ok_or_eyre("unable to get current branch for local repo")?
            .to_string();

        Ok(branch)
    }

    async fn create_tag(&self, name: String) -> Result<()> {
        let repo = self.repo.lock().await;
        let head = repo.head()?.peel_to_commit()?;

        repo.tag_lightweight(&name, head.as_object(), false)?;

        info!("created tag {name} at {}", head.id());

        Ok(())
    }

    async fn push_tag(&self, remote: String, name: String) -> Result<()> {
        self.git_push(&remote, &format!("refs/tags/{name}")).await?;
        info!("pushed tag {name} to {remote}");
        Ok(())
    }

    async fn commit_paths(
        &self,
        paths: Vec<String>,
        message: String,
    ) -> Result<Option<String>> {
        let repo = self.repo.lock().await;

        let mut index = repo.index()?;
        for path in &paths {
            index.add_path(Path::new(path))?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let parent = repo.head()?.peel_to_commit()?;

        if parent.tree_id() == tree_id {
            debug!("no changes to commit in {}", paths.join(", "));
            return Ok(None);
        }

        let config = repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        debug!("using committer: user: {user}, email: {email}");

        let committer = git2::Signature::now(user, email)?;
        let tree = repo.find_tree(tree_id)?;
        let id = repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            &message,
            &tree,
            &[&parent],
        )?;

        info!("committed {} as {id}", paths.join(", "));

        Ok(Some(id.to_string()))
    }

    async fn push_branch(&self, remote: String, branch: String) -> Result<()> {
        self.git_push(&remote, &format!("HEAD:refs/heads/{branch}"))
            .await?;
        info!("pushed {branch} to {remote}");
        Ok(())
    }

    async fn is_clean(&self) -> Result<bool> {
        let repo = self.repo.lock().await;

        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;

        Ok(statuses.is_empty())
    }
}
