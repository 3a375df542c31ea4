use async_trait::async_trait;
use log::*;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tokio::process::Command;

use crate::{
    Result,
    config::ExecConfig,
    error::CalverError,
    plugin::{
        LifecycleContext, LifecycleStage, Plugin, ReleaseRecord,
        builtin::releases,
    },
};

/// Runs a configured shell command for each stage.
///
/// Commands run through `sh -c` from the repository root with the release
/// exposed as `CALVER_*` environment variables. A non-zero exit fails the
/// stage. For `generate_notes`, standard output becomes the notes.
pub struct ExecPlugin {
    commands: ExecConfig,
    root: PathBuf,
}

impl ExecPlugin {
    pub fn new(commands: ExecConfig, root: PathBuf) -> Self {
        Self { commands, root }
    }

    fn env_vars(
        ctx: &LifecycleContext,
        stage: LifecycleStage,
    ) -> Vec<(&'static str, String)> {
        let options = ctx.options();
        let records = releases(ctx);

        vec![
            ("CALVER_STAGE", stage.to_string()),
            ("CALVER_BRANCH", options.branch.clone()),
            ("CALVER_DRY_RUN", options.dry_run.to_string()),
            ("CALVER_VERSION", joined(records, |r| r.version())),
            ("CALVER_TAGS", joined(records, |r| r.tag_name())),
            ("CALVER_PACKAGES", joined(records, |r| r.package().name.as_str())),
            (
                "CALVER_NOTES",
                ctx.next_release()
                    .map(|r| r.notes().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }

    /// Runs the command for `stage`, returning its trimmed stdout. `None`
    /// when no command is configured.
    async fn run(
        &self,
        stage: LifecycleStage,
        ctx: &LifecycleContext,
        error: Option<&CalverError>,
    ) -> Result<Option<String>> {
        let Some(script) = self.commands.command(stage) else {
            return Ok(None);
        };

        debug!("exec {stage}: {script}");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script).current_dir(&self.root);

        for (key, value) in Self::env_vars(ctx, stage) {
            cmd.env(key, value);
        }

        if let Some(error) = error {
            cmd.env("CALVER_ERROR", error.to_string());
        }

        let output = cmd.output().await.map_err(|e| {
            CalverError::Other(color_eyre::eyre::eyre!(
                "failed to execute {script}: {e}"
            ))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CalverError::Other(color_eyre::eyre::eyre!(
                "{script} failed with exit code {}\nStdout: {stdout}\nStderr: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(Some(stdout))
    }
}

fn joined<'a>(
    records: &'a [ReleaseRecord],
    f: impl Fn(&'a ReleaseRecord) -> &'a str,
) -> String {
    records.iter().map(f).collect::<Vec<_>>().join(",")
}

#[async_trait]
impl Plugin for ExecPlugin {
    fn name(&self) -> String {
        "exec".into()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        LifecycleStage::iter()
            .filter(|stage| self.commands.command(*stage).is_some())
            .collect()
    }

    async fn verify_conditions(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::VerifyConditions, ctx, None).await?;
        Ok(())
    }

    async fn analyze_commits(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::AnalyzeCommits, ctx, None).await?;
        Ok(())
    }

    async fn verify_release(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::VerifyRelease, ctx, None).await?;
        Ok(())
    }

    async fn generate_notes(
        &self,
        ctx: &mut LifecycleContext,
    ) -> Result<Option<String>> {
        let notes = self.run(LifecycleStage::GenerateNotes, ctx, None).await?;
        Ok(notes.filter(|n| !n.is_empty()))
    }

    async fn prepare(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::Prepare, ctx, None).await?;
        Ok(())
    }

    async fn publish(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::Publish, ctx, None).await?;
        Ok(())
    }

    async fn success(&self, ctx: &mut LifecycleContext) -> Result<()> {
        self.run(LifecycleStage::Success, ctx, None).await?;
        Ok(())
    }

    async fn fail(
        &self,
        ctx: &mut LifecycleContext,
        error: &CalverError,
    ) -> Result<()> {
        self.run(LifecycleStage::Fail, ctx, Some(error)).await?;
        Ok(())
    }
}
