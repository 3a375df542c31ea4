//! Package discovery for single-package repositories and JavaScript
//! monorepos.

use serde::Serialize;
use std::path::Path;
use strum::Display;

use crate::workspace::descriptor::PackageDescriptor;

pub mod descriptor;
pub mod resolver;

pub use descriptor::DESCRIPTOR_FILE;
pub use resolver::WorkspaceResolver;

/// A releasable unit. Identity is its repo-relative path ("." when the
/// repository is a single package).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub path: String,
    /// Version declared in the package descriptor
    pub version: Option<String>,
    #[serde(skip)]
    pub private: bool,
    /// Whether the descriptor declares a `build` script
    pub has_build: bool,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version: None,
            private: false,
            has_build: false,
        }
    }

    pub fn from_descriptor(
        name: String,
        path: String,
        descriptor: &PackageDescriptor,
    ) -> Self {
        Self {
            name,
            path,
            version: descriptor.version.clone(),
            private: descriptor.private,
            has_build: descriptor.has_build(),
        }
    }

    /// Last path component, or the package name for the repository root.
    pub fn basename(&self) -> &str {
        if self.is_root() {
            return &self.name;
        }

        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.name)
    }

    pub fn is_root(&self) -> bool {
        self.path == "." || self.path.is_empty()
    }
}

/// Monorepo tooling detected at the repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum WorkspaceKind {
    Single,
    Nx,
    Turbo,
    Pnpm,
    #[strum(serialize = "package.json")]
    PackageJson,
}

/// Resolved package list, ordered by path.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub kind: WorkspaceKind,
    pub packages: Vec<Package>,
}

impl Workspace {
    pub fn is_monorepo(&self) -> bool {
        self.kind != WorkspaceKind::Single
    }
}
