//! Configuration loading and parsing for `.calver-release.toml` files and the
//! `release` key of the root `package.json`.
use merge::Merge;
use serde::{Deserialize, Serialize};

use crate::{
    Result, error::CalverError, plugin::LifecycleStage,
    version::VersionFormatSetting,
};

pub mod resolver;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = ".calver-release.toml";

pub const DEFAULT_BRANCHES: &[&str] = &["main", "master"];
pub const DEFAULT_PLUGINS: &[&str] = &["commit-analyzer", "release-notes", "git"];
pub const DEFAULT_REMOTE: &str = "origin";

/// Tera template rendered once per run. `releases` holds every release
/// record; `branch` and `dry_run` are also in scope.
pub const DEFAULT_NOTES_TEMPLATE: &str = r#"{% for release in releases -%}
## {{ release.package.name }} {{ release.version }}
{% for commit in release.analysis.release_commits %}
- **{{ commit.annotation }}**: {{ commit.message }}
{%- endfor %}
{% if not loop.last %}
{% endif -%}
{% endfor -%}"#;

/// Release notes settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Tera template for the generated notes.
    pub template: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_NOTES_TEMPLATE.into(),
        }
    }
}

/// Shell commands run by the `exec` plugin, one optional command per stage.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    #[serde(alias = "verifyConditionsCmd")]
    pub verify_conditions: Option<String>,
    #[serde(alias = "analyzeCommitsCmd")]
    pub analyze_commits: Option<String>,
    #[serde(alias = "verifyReleaseCmd")]
    pub verify_release: Option<String>,
    #[serde(alias = "generateNotesCmd")]
    pub generate_notes: Option<String>,
    #[serde(alias = "prepareCmd")]
    pub prepare: Option<String>,
    #[serde(alias = "publishCmd")]
    pub publish: Option<String>,
    #[serde(alias = "successCmd")]
    pub success: Option<String>,
    #[serde(alias = "failCmd")]
    pub fail: Option<String>,
}

impl ExecConfig {
    pub fn command(&self, stage: LifecycleStage) -> Option<&str> {
        let cmd = match stage {
            LifecycleStage::VerifyConditions => &self.verify_conditions,
            LifecycleStage::AnalyzeCommits => &self.analyze_commits,
            LifecycleStage::VerifyRelease => &self.verify_release,
            LifecycleStage::GenerateNotes => &self.generate_notes,
            LifecycleStage::Prepare => &self.prepare,
            LifecycleStage::Publish => &self.publish,
            LifecycleStage::Success => &self.success,
            LifecycleStage::Fail => &self.fail,
        };
        cmd.as_deref()
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Branches releases may be cut from.
    pub branches: Vec<String>,
    pub version_format: VersionFormatSetting,
    /// Move the version to the current month when it is newer than the
    /// declared version's month.
    pub auto_update_month: bool,
    pub dry_run: bool,
    /// Plugin identifiers in registration order.
    pub plugins: Vec<String>,
    /// Remote tags are pushed to.
    pub remote: String,
    pub notes: NotesConfig,
    pub exec: ExecConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branches: to_strings(DEFAULT_BRANCHES),
            version_format: VersionFormatSetting::Auto,
            auto_update_month: false,
            dry_run: false,
            plugins: to_strings(DEFAULT_PLUGINS),
            remote: DEFAULT_REMOTE.into(),
            notes: NotesConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.branches.is_empty() {
            return Err(CalverError::invalid_config(
                "at least one release branch must be configured",
            ));
        }

        if self.remote.trim().is_empty() {
            return Err(CalverError::invalid_config("remote must not be empty"));
        }

        Ok(())
    }

    pub fn is_release_branch(&self, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }
}

/// One layer of configuration. Unset fields fall through to lower layers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Merge)]
#[serde(default)]
pub struct PartialConfig {
    #[merge(strategy = merge::option::overwrite_none)]
    pub branches: Option<Vec<String>>,
    #[serde(alias = "versionFormat")]
    #[merge(strategy = merge::option::overwrite_none)]
    pub version_format: Option<VersionFormatSetting>,
    #[serde(alias = "autoUpdateMonth")]
    #[merge(strategy = merge::option::overwrite_none)]
    pub auto_update_month: Option<bool>,
    #[serde(alias = "dryRun")]
    #[merge(strategy = merge::option::overwrite_none)]
    pub dry_run: Option<bool>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub plugins: Option<Vec<String>>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub remote: Option<String>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub notes: Option<NotesConfig>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub exec: Option<ExecConfig>,
}

impl From<PartialConfig> for Config {
    fn from(partial: PartialConfig) -> Self {
        let defaults = Config::default();

        Self {
            branches: partial.branches.unwrap_or(defaults.branches),
            version_format: partial
                .version_format
                .unwrap_or(defaults.version_format),
            auto_update_month: partial
                .auto_update_month
                .unwrap_or(defaults.auto_update_month),
            dry_run: partial.dry_run.unwrap_or(defaults.dry_run),
            plugins: partial.plugins.unwrap_or(defaults.plugins),
            remote: partial.remote.unwrap_or(defaults.remote),
            notes: partial.notes.unwrap_or(defaults.notes),
            exec: partial.exec.unwrap_or(defaults.exec),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
