//! Layered configuration resolution.
//!
//! ## Resolution Precedence (highest to lowest)
//!
//! 1. Explicit CLI options
//! 2. `release` key of the root `package.json`
//! 3. `.calver-release.toml`
//! 4. Built-in defaults

use derive_builder::Builder;
use log::*;
use merge::Merge;
use std::path::Path;

use crate::{
    Result,
    config::{Config, PartialConfig},
    workspace::descriptor::PackageDescriptor,
};

/// Merges configuration layers into a resolved [`Config`].
#[derive(Builder, Default)]
#[builder(default)]
pub struct ConfigResolver {
    file: PartialConfig,
    descriptor: PartialConfig,
    overrides: PartialConfig,
}

impl ConfigResolver {
    /// Pure merge of the layers; does not touch the filesystem.
    pub fn resolve(&self) -> Config {
        let mut merged = self.overrides.clone();
        merged.merge(self.descriptor.clone());
        merged.merge(self.file.clone());
        Config::from(merged)
    }
}

/// Reads the TOML config file. A missing file yields an empty layer.
pub fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.is_file() {
        info!(
            "configuration file {} not found: using defaults",
            path.display()
        );
        return Ok(PartialConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let partial = toml::from_str(&content)?;

    Ok(partial)
}

/// Reads the `release` key of the package descriptor at `root`. Descriptor
/// problems are logged and yield an empty layer.
pub fn load_descriptor_config(root: &Path) -> PartialConfig {
    let descriptor = match PackageDescriptor::load(root) {
        Ok(Some(descriptor)) => descriptor,
        Ok(None) => return PartialConfig::default(),
        Err(err) => {
            warn!("ignoring release config in package descriptor: {err}");
            return PartialConfig::default();
        }
    };

    let Some(release) = descriptor.release else {
        return PartialConfig::default();
    };

    match serde_json::from_value(release) {
        Ok(partial) => partial,
        Err(err) => {
            warn!("ignoring unsupported release config in package descriptor: {err}");
            PartialConfig::default()
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
