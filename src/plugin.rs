//! Lifecycle plugins.
//!
//! A plugin declares the stages it takes part in and overrides the matching
//! hook methods; every hook has a no-op default.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{Result, error::CalverError};

pub mod builtin;
pub mod context;
pub mod factory;
pub mod registry;
pub mod stage;

pub use context::{LifecycleContext, NextRelease, ReleaseRecord, RunOptions};
pub use factory::{PluginDeps, build_registry, plugin_key};
pub use registry::PluginRegistry;
pub use stage::LifecycleStage;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Identifier used in logs and error messages.
    fn name(&self) -> String;

    /// Stages this plugin is registered for, in any order.
    fn stages(&self) -> Vec<LifecycleStage>;

    async fn verify_conditions(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    async fn analyze_commits(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    async fn verify_release(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    /// Returns a block of release notes to append, if any.
    async fn generate_notes(
        &self,
        _ctx: &mut LifecycleContext,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    async fn prepare(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    async fn publish(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    async fn success(&self, _ctx: &mut LifecycleContext) -> Result<()> {
        Ok(())
    }

    /// Receives the error that ended the run.
    async fn fail(
        &self,
        _ctx: &mut LifecycleContext,
        _error: &CalverError,
    ) -> Result<()> {
        Ok(())
    }
}
