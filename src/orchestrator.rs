//! Drives one release run through the plugin lifecycle.
//!
//! ```text
//! Init -> VerifyConditions -> Analyze -> NoRelease
//!                                     -> VerifyRelease -> GenerateNotes -> DryRunComplete
//!                                                                       -> Prepare -> Publish -> Success
//! ```
//!
//! Any error after Init moves the run to Fail, which gives every fail hook a
//! chance to run before the error is returned.
use color_eyre::eyre::eyre;
use derive_builder::Builder;
use log::*;
use std::{path::PathBuf, sync::Arc};
use strum::Display;

use crate::{
    Result,
    config::Config,
    error::CalverError,
    orchestrator::core::Core,
    plugin::{
        LifecycleContext, LifecycleStage, NextRelease, Plugin, PluginRegistry,
        RunOptions,
    },
    vcs::VcsManager,
    version::{YearMonth, resolve_version_format},
};

pub mod changes;
pub mod core;

/// States of a release run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    Init,
    VerifyConditions,
    Analyze,
    NoRelease,
    VerifyRelease,
    GenerateNotes,
    DryRunComplete,
    Prepare,
    Publish,
    Success,
    Fail,
}

impl From<LifecycleStage> for LifecycleState {
    fn from(stage: LifecycleStage) -> Self {
        match stage {
            LifecycleStage::VerifyConditions => Self::VerifyConditions,
            LifecycleStage::AnalyzeCommits => Self::Analyze,
            LifecycleStage::VerifyRelease => Self::VerifyRelease,
            LifecycleStage::GenerateNotes => Self::GenerateNotes,
            LifecycleStage::Prepare => Self::Prepare,
            LifecycleStage::Publish => Self::Publish,
            LifecycleStage::Success => Self::Success,
            LifecycleStage::Fail => Self::Fail,
        }
    }
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Not a release branch, or no package needs a release.
    NoRelease,
    /// The release that would have been published.
    DryRun(NextRelease),
    Released(NextRelease),
}

impl RunOutcome {
    pub fn next_release(&self) -> Option<&NextRelease> {
        match self {
            RunOutcome::NoRelease => None,
            RunOutcome::DryRun(next) | RunOutcome::Released(next) => Some(next),
        }
    }
}

#[derive(Builder)]
#[builder(
    pattern = "owned",
    setter(into),
    build_fn(private, name = "_build")
)]
pub struct OrchestratorParams {
    pub config: Arc<Config>,
    pub vcs: Arc<VcsManager>,
    pub registry: PluginRegistry,
    /// Repository root
    pub root: PathBuf,
    /// Branch to release from instead of the checked out one
    #[builder(setter(into, strip_option), default)]
    pub branch: Option<String>,
    #[builder(default = "YearMonth::current()")]
    pub today: YearMonth,
}

impl OrchestratorParamsBuilder {
    pub fn build(self) -> Result<Orchestrator> {
        let params = self.build_params()?;
        Ok(Orchestrator::new(params))
    }

    fn build_params(self) -> Result<OrchestratorParams> {
        self._build().map_err(|e| {
            CalverError::invalid_config(format!(
                "Failed to build release orchestrator: {}",
                e
            ))
        })
    }
}

pub struct Orchestrator {
    config: Arc<Config>,
    vcs: Arc<VcsManager>,
    registry: PluginRegistry,
    root: PathBuf,
    branch: Option<String>,
    core: Core,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            core: Core::new(
                Arc::clone(&params.vcs),
                params.root.clone(),
                params.today,
            ),
            config: params.config,
            vcs: params.vcs,
            registry: params.registry,
            root: params.root,
            branch: params.branch,
        }
    }

    /// Runs the lifecycle once.
    pub async fn run(&self) -> Result<RunOutcome> {
        enter(LifecycleState::Init);

        let Some(options) = self.init().await? else {
            enter(LifecycleState::NoRelease);
            return Ok(RunOutcome::NoRelease);
        };

        let mut ctx = LifecycleContext::new(options);

        match self.drive(&mut ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                enter(LifecycleState::Fail);
                error!("release failed: {err}");
                let failures = self.fail(&mut ctx, &err).await;
                if !failures.is_empty() {
                    let messages = failures
                        .iter()
                        .map(|f| f.to_string())
                        .collect::<Vec<_>>();
                    warn!(
                        "{} fail hook(s) did not complete: {}",
                        failures.len(),
                        messages.join("; ")
                    );
                }
                Err(err)
            }
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    //// private
    ////////////////////////////////////////////////////////////////////////////

    /// Resolves run options. `None` when the branch is not a release branch.
    async fn init(&self) -> Result<Option<RunOptions>> {
        let branch = match &self.branch {
            Some(branch) => branch.clone(),
            None => self.vcs.current_branch().await?,
        };

        if !self.config.is_release_branch(&branch) {
            info!(
                "branch {branch} is not a release branch ({}): nothing to release",
                self.config.branches.join(", ")
            );
            return Ok(None);
        }

        let version_format = resolve_version_format(
            self.config.version_format,
            &self.config.plugins,
        );

        info!("releasing from {branch} using {version_format} versions");

        Ok(Some(RunOptions {
            root: self.root.clone(),
            branch,
            dry_run: self.config.dry_run,
            remote: self.config.remote.clone(),
            version_format,
            auto_update_month: self.config.auto_update_month,
        }))
    }

    async fn drive(&self, ctx: &mut LifecycleContext) -> Result<RunOutcome> {
        self.run_stage(LifecycleStage::VerifyConditions, ctx).await?;

        enter(LifecycleState::Analyze);
        let Some(next_release) = self.core.analyze(ctx.options()).await? else {
            enter(LifecycleState::NoRelease);
            info!("no release needed");
            return Ok(RunOutcome::NoRelease);
        };
        ctx.set_next_release(next_release);

        self.run_stage(LifecycleStage::AnalyzeCommits, ctx).await?;
        self.run_stage(LifecycleStage::VerifyRelease, ctx).await?;
        self.run_stage(LifecycleStage::GenerateNotes, ctx).await?;

        if ctx.options().dry_run {
            enter(LifecycleState::DryRunComplete);
            warn!("dry_run: stopping before prepare");
            return Ok(RunOutcome::DryRun(snapshot(ctx)?));
        }

        self.run_stage(LifecycleStage::Prepare, ctx).await?;
        self.run_stage(LifecycleStage::Publish, ctx).await?;
        self.run_stage(LifecycleStage::Success, ctx).await?;

        Ok(RunOutcome::Released(snapshot(ctx)?))
    }

    /// Runs every hook registered for `stage`, one at a time, in
    /// registration order. The first error stops the stage.
    async fn run_stage(
        &self,
        stage: LifecycleStage,
        ctx: &mut LifecycleContext,
    ) -> Result<()> {
        enter(stage.into());

        for plugin in self.registry.for_stage(stage) {
            debug!("{stage}: running {}", plugin.name());
            call_hook(plugin, stage, ctx)
                .await
                .map_err(|err| attribute(stage, plugin, err))?;
        }

        Ok(())
    }

    /// Gives every fail hook a chance to run. Returns the attributed errors
    /// of the fail hooks that did not complete; they never replace `error`.
    async fn fail(
        &self,
        ctx: &mut LifecycleContext,
        error: &CalverError,
    ) -> Vec<CalverError> {
        let mut failures = vec![];

        for plugin in self.registry.for_stage(LifecycleStage::Fail) {
            if let Err(err) = plugin.fail(ctx, error).await {
                failures.push(attribute(LifecycleStage::Fail, plugin, err));
            }
        }

        failures
    }
}

fn enter(state: LifecycleState) {
    debug!("lifecycle: {state}");
}

async fn call_hook(
    plugin: &dyn Plugin,
    stage: LifecycleStage,
    ctx: &mut LifecycleContext,
) -> Result<()> {
    match stage {
        LifecycleStage::VerifyConditions => plugin.verify_conditions(ctx).await,
        LifecycleStage::AnalyzeCommits => plugin.analyze_commits(ctx).await,
        LifecycleStage::VerifyRelease => plugin.verify_release(ctx).await,
        LifecycleStage::GenerateNotes => {
            if let Some(notes) = plugin.generate_notes(ctx).await? {
                ctx.append_notes(&notes);
            }
            Ok(())
        }
        LifecycleStage::Prepare => plugin.prepare(ctx).await,
        LifecycleStage::Publish => plugin.publish(ctx).await,
        LifecycleStage::Success => plugin.success(ctx).await,
        LifecycleStage::Fail => Ok(()),
    }
}

/// Attributes an error to the hook that raised it.
fn attribute(
    stage: LifecycleStage,
    plugin: &dyn Plugin,
    err: CalverError,
) -> CalverError {
    match err {
        err @ CalverError::HookFailed { .. } => err,
        err => CalverError::hook_failed(stage, plugin.name(), err.to_string()),
    }
}

fn snapshot(ctx: &LifecycleContext) -> Result<NextRelease> {
    ctx.next_release()
        .cloned()
        .ok_or_else(|| CalverError::Other(eyre!("release decision missing")))
}
