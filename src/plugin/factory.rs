//! Maps configured plugin identifiers to built-in implementations.
use std::{path::PathBuf, sync::Arc};

use crate::{
    Result,
    config::Config,
    error::CalverError,
    plugin::{
        Plugin, PluginRegistry,
        builtin::{
            CommitAnalyzerPlugin, ExecPlugin, GitPlugin, NpmPlugin,
            ReleaseNotesPlugin,
        },
    },
    vcs::VcsManager,
};

/// Shared handles plugins are constructed with.
#[derive(Clone)]
pub struct PluginDeps {
    pub vcs: Arc<VcsManager>,
    pub root: PathBuf,
}

/// Lookup key for an identifier: its last path segment, so that
/// `@semantic-release/npm` and `npm` select the same plugin.
pub fn plugin_key(identifier: &str) -> &str {
    identifier
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or(identifier)
}

pub fn create_plugin(
    identifier: &str,
    config: &Config,
    deps: &PluginDeps,
) -> Result<Box<dyn Plugin>> {
    let plugin: Box<dyn Plugin> = match plugin_key(identifier) {
        "commit-analyzer" => Box::new(CommitAnalyzerPlugin::new(
            Arc::clone(&deps.vcs),
            deps.root.clone(),
        )),
        "release-notes" | "release-notes-generator" => {
            Box::new(ReleaseNotesPlugin::new(config.notes.template.clone()))
        }
        "git" => Box::new(GitPlugin::new(
            Arc::clone(&deps.vcs),
            config.remote.clone(),
            deps.root.clone(),
        )),
        "npm" => Box::new(NpmPlugin::new(deps.root.clone())),
        "exec" => {
            Box::new(ExecPlugin::new(config.exec.clone(), deps.root.clone()))
        }
        _ => return Err(CalverError::UnknownPlugin(identifier.to_string())),
    };

    Ok(plugin)
}

/// Builds a registry with one plugin per configured identifier, in order.
pub fn build_registry(
    config: &Config,
    deps: &PluginDeps,
) -> Result<PluginRegistry> {
    let mut registry = PluginRegistry::new();

    for identifier in config.plugins.iter() {
        registry.register(create_plugin(identifier, config, deps)?);
    }

    Ok(registry)
}
