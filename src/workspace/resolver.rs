use log::*;
use saphyr::LoadableYamlNode;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::{
    Result,
    error::CalverError,
    path_helpers::{normalize_path, relative_path},
    workspace::{
        Package, Workspace, WorkspaceKind,
        descriptor::{DESCRIPTOR_FILE, PackageDescriptor},
    },
};

pub const NX_CONFIG: &str = "nx.json";
pub const TURBO_CONFIG: &str = "turbo.json";
pub const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";

const NX_DEFAULT_PATTERNS: &[&str] = &["apps/*", "libs/*", "packages/*"];
const TURBO_DEFAULT_PATTERNS: &[&str] = &["apps/*", "packages/*"];

/// Discovers the packages of a repository rooted at a directory.
pub struct WorkspaceResolver {
    root: PathBuf,
}

impl WorkspaceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the workspace. Never fails: any problem with monorepo
    /// configuration falls back to single-package mode.
    pub fn resolve(&self) -> Workspace {
        match self.detect() {
            Ok(Some(workspace)) if !workspace.packages.is_empty() => {
                info!(
                    "detected {} workspace with {} packages",
                    workspace.kind,
                    workspace.packages.len()
                );
                workspace
            }
            Ok(Some(workspace)) => {
                warn!(
                    "{} workspace resolved no packages: falling back to single-package mode",
                    workspace.kind
                );
                self.single()
            }
            Ok(None) => {
                debug!("no workspace configuration found: single-package mode");
                self.single()
            }
            Err(err) => {
                warn!(
                    "failed to read workspace configuration: {err}: falling back to single-package mode"
                );
                self.single()
            }
        }
    }

    fn detect(&self) -> Result<Option<Workspace>> {
        let (kind, patterns) = if self.root.join(NX_CONFIG).is_file() {
            (WorkspaceKind::Nx, self.nx_patterns()?)
        } else if self.root.join(TURBO_CONFIG).is_file() {
            (WorkspaceKind::Turbo, self.turbo_patterns()?)
        } else if self.root.join(PNPM_WORKSPACE).is_file() {
            (WorkspaceKind::Pnpm, self.pnpm_patterns()?)
        } else if let Some(patterns) = self.descriptor_patterns()? {
            (WorkspaceKind::PackageJson, patterns)
        } else {
            return Ok(None);
        };

        debug!("{kind} workspace patterns: {patterns:?}");

        let mut packages = vec![];
        for pattern in patterns.iter() {
            packages.extend(self.expand_pattern(pattern)?);
        }

        packages.sort_by(|a, b| a.path.cmp(&b.path));
        packages.dedup_by(|a, b| a.path == b.path);

        Ok(Some(Workspace { kind, packages }))
    }

    fn nx_patterns(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(self.root.join(NX_CONFIG))?;
        let doc: Value = serde_json::from_str(&content)?;

        let layout = &doc["workspaceLayout"];
        let dirs: Vec<String> = ["appsDir", "libsDir"]
            .iter()
            .filter_map(|key| layout[key].as_str())
            .map(|dir| format!("{}/*", dir.trim_end_matches('/')))
            .collect();

        if dirs.is_empty() {
            return Ok(to_owned(NX_DEFAULT_PATTERNS));
        }

        Ok(dirs)
    }

    fn turbo_patterns(&self) -> Result<Vec<String>> {
        if let Some(patterns) = self.descriptor_patterns()? {
            return Ok(patterns);
        }

        if self.root.join(PNPM_WORKSPACE).is_file() {
            return self.pnpm_patterns();
        }

        Ok(to_owned(TURBO_DEFAULT_PATTERNS))
    }

    fn pnpm_patterns(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(self.root.join(PNPM_WORKSPACE))?;

        let docs = saphyr::Yaml::load_from_str(&content).map_err(|e| {
            CalverError::invalid_config(format!(
                "failed to parse {PNPM_WORKSPACE}: {e}"
            ))
        })?;

        if let Some(doc) = docs.first()
            && let Some(packages) = doc["packages"].as_vec()
        {
            return Ok(packages
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect());
        }

        Err(CalverError::invalid_config(format!(
            "{PNPM_WORKSPACE} has no 'packages' list"
        )))
    }

    fn descriptor_patterns(&self) -> Result<Option<Vec<String>>> {
        let patterns = PackageDescriptor::load(&self.root)?
            .and_then(|d| d.workspace_patterns().map(|p| p.to_vec()));
        Ok(patterns)
    }

    /// Expands one pattern. `dir/*` and `dir/**` list the immediate
    /// subdirectories of `dir` that contain a descriptor; anything else names
    /// a single directory.
    fn expand_pattern(&self, pattern: &str) -> Result<Vec<Package>> {
        if pattern.starts_with('!') {
            debug!("skipping negated pattern {pattern}");
            return Ok(vec![]);
        }

        let pattern = normalize_path(pattern);
        let pattern = pattern.trim_start_matches("./");

        let mut packages = vec![];

        if pattern.ends_with("/*") || pattern.ends_with("/**") {
            let base = pattern.trim_end_matches("/**").trim_end_matches("/*");
            let scan_dir = self.root.join(base);

            if !scan_dir.is_dir() {
                return Ok(packages);
            }

            for entry in std::fs::read_dir(&scan_dir)? {
                let path = entry?.path();
                if path.is_dir()
                    && let Some(package) = self.load_package(&path)?
                {
                    packages.push(package);
                }
            }
        } else {
            let dir = self.root.join(pattern);
            if dir.is_dir()
                && let Some(package) = self.load_package(&dir)?
            {
                packages.push(package);
            }
        }

        Ok(packages)
    }

    fn load_package(&self, dir: &Path) -> Result<Option<Package>> {
        let Some(descriptor) = PackageDescriptor::load(dir)? else {
            return Ok(None);
        };

        let path = relative_path(&self.root, dir);
        let name = descriptor.name.clone().unwrap_or_else(|| dir_name(dir));

        Ok(Some(Package::from_descriptor(name, path, &descriptor)))
    }

    fn single(&self) -> Workspace {
        let descriptor = match PackageDescriptor::load(&self.root) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                warn!("failed to read root {DESCRIPTOR_FILE}: {err}");
                None
            }
        };

        let fallback = self
            .root
            .canonicalize()
            .map(|p| dir_name(&p))
            .unwrap_or_else(|_| dir_name(&self.root));

        let package = match descriptor {
            Some(d) => Package::from_descriptor(
                d.name.clone().unwrap_or(fallback),
                ".".into(),
                &d,
            ),
            None => Package::new(fallback, "."),
        };

        Workspace {
            kind: WorkspaceKind::Single,
            packages: vec![package],
        }
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".into())
}

fn to_owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests;
