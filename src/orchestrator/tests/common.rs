//! Common test utilities for orchestrator tests.

use async_trait::async_trait;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use strum::IntoEnumIterator;

use crate::{
    Result,
    config::Config,
    error::CalverError,
    orchestrator::Orchestrator,
    plugin::{LifecycleContext, LifecycleStage, Plugin, PluginRegistry},
    vcs::{MockVcs, VcsManager},
    version::YearMonth,
};

pub use crate::test_helpers::{create_test_single_package, create_test_vcs};

/// Shared log of `plugin:stage` entries, in call order.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Records every hook call and optionally fails or contributes notes.
pub struct RecordingPlugin {
    name: String,
    stages: Vec<LifecycleStage>,
    journal: Journal,
    fail_at: Vec<LifecycleStage>,
    notes: Option<String>,
}

impl RecordingPlugin {
    /// A plugin registered for every stage.
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            stages: LifecycleStage::iter().collect(),
            journal: Arc::clone(journal),
            fail_at: vec![],
            notes: None,
        }
    }

    pub fn failing_at(mut self, stage: LifecycleStage) -> Self {
        self.fail_at.push(stage);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn record(&self, stage: LifecycleStage) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{stage}", self.name));

        if self.fail_at.contains(&stage) {
            return Err(CalverError::vcs(format!("{} broke", self.name)));
        }

        Ok(())
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn stages(&self) -> Vec<LifecycleStage> {
        self.stages.clone()
    }

    async fn verify_conditions(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::VerifyConditions)
    }

    async fn analyze_commits(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::AnalyzeCommits)
    }

    async fn verify_release(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::VerifyRelease)
    }

    async fn generate_notes(
        &self,
        _ctx: &mut LifecycleContext,
    ) -> Result<Option<String>> {
        self.record(LifecycleStage::GenerateNotes)?;
        Ok(self.notes.clone())
    }

    async fn prepare(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::Prepare)
    }

    async fn publish(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::Publish)
    }

    async fn success(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        self.record(LifecycleStage::Success)
    }

    async fn fail(
        &self,
        _ctx: &mut LifecycleContext,
        _error: &CalverError,
    ) -> Result<()> {
        self.record(LifecycleStage::Fail)
    }
}

/// Creates an orchestrator for `root` where the current month is 25.08.
pub fn create_orchestrator(
    root: &Path,
    vcs: MockVcs,
    plugins: Vec<Box<dyn Plugin>>,
    config: Config,
) -> Orchestrator {
    let mut registry = PluginRegistry::new();
    for plugin in plugins {
        registry.register(plugin);
    }

    Orchestrator::builder()
        .vcs(Arc::new(VcsManager::new(Box::new(vcs), config.dry_run)))
        .config(config)
        .registry(registry)
        .root(root)
        .today(YearMonth::new(25, 8))
        .build()
        .unwrap()
}
