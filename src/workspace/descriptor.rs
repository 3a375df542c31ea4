use serde::Deserialize;
use serde_json::{Value, json};
use std::{collections::HashMap, path::Path};

use crate::Result;

pub const DESCRIPTOR_FILE: &str = "package.json";

/// `workspaces` may be a plain list or an object with a `packages` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkspacesField {
    Array(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl WorkspacesField {
    pub fn patterns(&self) -> &[String] {
        match self {
            WorkspacesField::Array(patterns) => patterns,
            WorkspacesField::Object { packages } => packages,
        }
    }
}

/// Fields read from a package's `package.json`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PackageDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub workspaces: Option<WorkspacesField>,
    #[serde(default)]
    pub scripts: HashMap<String, String>,
    #[serde(default)]
    pub private: bool,
    /// Embedded release configuration
    #[serde(default)]
    pub release: Option<Value>,
}

impl PackageDescriptor {
    /// Reads the descriptor in `dir`. A missing file is `Ok(None)`; an
    /// unreadable or malformed one is an error.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(DESCRIPTOR_FILE);

        if !file.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&file)?;
        let descriptor = serde_json::from_str(&content)?;

        Ok(Some(descriptor))
    }

    pub fn has_build(&self) -> bool {
        self.scripts.contains_key("build")
    }

    pub fn workspace_patterns(&self) -> Option<&[String]> {
        self.workspaces.as_ref().map(|w| w.patterns())
    }
}

/// Returns `content` with its top-level `version` replaced, keeping key
/// order and a trailing newline.
pub fn set_descriptor_version(content: &str, version: &str) -> Result<String> {
    let mut doc: Value = serde_json::from_str(content)?;
    doc["version"] = json!(version);

    let mut formatted = serde_json::to_string_pretty(&doc)?;
    formatted.push('\n');

    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_descriptor_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DESCRIPTOR_FILE),
            r#"{
                "name": "@acme/core",
                "version": "25.07.2",
                "private": true,
                "scripts": { "build": "tsc", "test": "vitest" },
                "workspaces": { "packages": ["packages/*"] },
                "release": { "autoUpdateMonth": true }
            }"#,
        )
        .unwrap();

        let desc = PackageDescriptor::load(dir.path()).unwrap().unwrap();
        assert_eq!(desc.name.as_deref(), Some("@acme/core"));
        assert_eq!(desc.version.as_deref(), Some("25.07.2"));
        assert!(desc.private);
        assert!(desc.has_build());
        assert_eq!(desc.workspace_patterns().unwrap(), ["packages/*"]);
        assert!(desc.release.is_some());
    }

    #[test]
    fn missing_descriptor_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(PackageDescriptor::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn malformed_descriptor_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DESCRIPTOR_FILE), "{ nope").unwrap();
        assert!(PackageDescriptor::load(dir.path()).is_err());
    }

    #[test]
    fn workspaces_accepts_plain_list() {
        let desc: PackageDescriptor =
            serde_json::from_str(r#"{"workspaces": ["apps/*", "libs/shared"]}"#)
                .unwrap();
        assert_eq!(desc.workspace_patterns().unwrap(), ["apps/*", "libs/shared"]);
        assert!(!desc.has_build());
    }

    #[test]
    fn set_version_preserves_key_order() {
        let content = r#"{"name":"ui","version":"25.07.1","main":"index.js"}"#;
        let updated = set_descriptor_version(content, "25.08.1").unwrap();

        assert_eq!(
            updated,
            "{\n  \"name\": \"ui\",\n  \"version\": \"25.08.1\",\n  \"main\": \"index.js\"\n}\n"
        );
    }
}
