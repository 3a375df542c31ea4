//! Common functionality shared between commands
use log::*;
use std::{path::Path, sync::Arc};

use crate::{
    Result,
    cli::Args,
    config::{
        Config, DEFAULT_CONFIG_FILE,
        resolver::{
            ConfigResolverBuilder, load_config_file, load_descriptor_config,
        },
    },
    error::CalverError,
    orchestrator::Orchestrator,
    plugin::{PluginDeps, build_registry},
    vcs::{LocalRepo, VcsManager},
};

/// Resolves configuration for the repository at `root`, with CLI options
/// taking precedence.
pub fn load_configuration(root: &Path, args: &Args) -> Result<Config> {
    let config_file = args
        .config
        .clone()
        .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));

    let config = ConfigResolverBuilder::default()
        .file(load_config_file(&config_file)?)
        .descriptor(load_descriptor_config(root))
        .overrides(args.overrides())
        .build()
        .map_err(|e| CalverError::invalid_config(e.to_string()))?
        .resolve();

    config.validate()?;

    debug!("resolved configuration: {config:#?}");

    Ok(config)
}

/// Opens the repository containing the working directory and wires the
/// configured plugins into an orchestrator.
pub fn setup_orchestrator(args: &Args) -> Result<Orchestrator> {
    let repo = LocalRepo::new(std::env::current_dir()?)?;
    let root = repo.workdir().to_path_buf();

    let config = load_configuration(&root, args)?;

    let vcs = Arc::new(VcsManager::new(Box::new(repo), config.dry_run));
    let deps = PluginDeps {
        vcs: Arc::clone(&vcs),
        root: root.clone(),
    };
    let registry = build_registry(&config, &deps)?;

    info!("loaded plugins: {}", registry.names().join(", "));

    let mut builder = Orchestrator::builder()
        .config(config)
        .vcs(vcs)
        .registry(registry)
        .root(root);

    if let Some(branch) = &args.branch {
        builder = builder.branch(branch.clone());
    }

    builder.build()
}
