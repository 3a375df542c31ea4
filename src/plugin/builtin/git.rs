use async_trait::async_trait;
use log::*;
use std::{path::PathBuf, sync::Arc};

use crate::{
    Result,
    error::CalverError,
    path_helpers::relative_path,
    plugin::{LifecycleContext, LifecycleStage, Plugin, builtin::releases},
    vcs::VcsManager,
    workspace::DESCRIPTOR_FILE,
};

/// Commits bumped package descriptors, then tags each released version and
/// pushes the commit and tags to a remote.
pub struct GitPlugin {
    vcs: Arc<VcsManager>,
    remote: String,
    root: PathBuf,
}

impl GitPlugin {
    pub fn new(vcs: Arc<VcsManager>, remote: String, root: PathBuf) -> Self {
        Self { vcs, remote, root }
    }

    /// Repo-relative descriptors of the released packages that exist on
    /// disk.
    fn release_descriptors(&self, ctx: &LifecycleContext) -> Vec<String> {
        releases(ctx)
            .iter()
            .map(|r| self.root.join(&r.package().path).join(DESCRIPTOR_FILE))
            .filter(|file| file.is_file())
            .map(|file| relative_path(&self.root, &file))
            .collect()
    }

    /// Commits descriptors rewritten during prepare so the tags land on the
    /// bumped versions. Runs in publish, after every prepare hook.
    async fn commit_release(&self, ctx: &mut LifecycleContext) -> Result<()> {
        let paths = self.release_descriptors(ctx);
        if paths.is_empty() {
            return Ok(());
        }

        let tags = releases(ctx)
            .iter()
            .map(|r| r.tag_name())
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("chore(release): {tags} [skip ci]");

        if let Some(id) = self.vcs.commit_paths(&paths, &message).await? {
            let branch = ctx.options().branch.clone();
            self.vcs.push_branch(&self.remote, &branch).await?;
            ctx.insert_field("git.commit", id);
        }

        Ok(())
    }
}

#[async_trait]
impl Plugin for GitPlugin {
    fn name(&self) -> String {
        "git".into()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        vec![LifecycleStage::VerifyRelease, LifecycleStage::Publish]
    }

    async fn verify_release(&self, ctx: &mut LifecycleContext) -> Result<()> {
        let existing = self.vcs.get_tags().await?;

        for record in releases(ctx) {
            if existing.iter().any(|t| t == record.tag_name()) {
                return Err(CalverError::vcs(format!(
                    "tag {} already exists",
                    record.tag_name()
                )));
            }
        }

        Ok(())
    }

    async fn publish(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.commit_release(ctx).await?;

        let mut created = vec![];

        for record in releases(ctx) {
            let tag = record.tag_name();
            info!("tagging {} as {tag}", record.package().name);
            self.vcs.create_tag(tag).await?;
            self.vcs.push_tag(&self.remote, tag).await?;
            created.push(tag.to_string());
        }

        if !created.is_empty() {
            ctx.insert_field("git.tags", created.join(","));
        }

        Ok(())
    }
}
