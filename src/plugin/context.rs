//! State shared with plugins during one run.
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    analyzer::CommitAnalysis,
    version::{ResolvedVersion, VersionFormat, tag_name},
    workspace::Package,
};

/// Run-wide settings visible to every hook.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    /// Repository root
    pub root: PathBuf,
    pub branch: String,
    pub dry_run: bool,
    pub remote: String,
    pub version_format: VersionFormat,
    pub auto_update_month: bool,
}

/// The release computed for one package. Identity fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    package: Package,
    version: String,
    tag_name: String,
    analysis: CommitAnalysis,
    release_notes: String,
    resolution: ResolvedVersion,
}

impl ReleaseRecord {
    /// `scoped` selects package-scoped tag names, used for monorepos.
    pub fn new(
        package: Package,
        resolution: ResolvedVersion,
        analysis: CommitAnalysis,
        scoped: bool,
    ) -> Self {
        let version = resolution.version.to_string();
        let scope = scoped.then_some(package.name.as_str());
        let tag_name = tag_name(&version, scope);
        let release_notes = analysis.notes();

        Self {
            package,
            version,
            tag_name,
            analysis,
            release_notes,
            resolution,
        }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn analysis(&self) -> &CommitAnalysis {
        &self.analysis
    }

    pub fn release_notes(&self) -> &str {
        &self.release_notes
    }

    pub fn resolution(&self) -> &ResolvedVersion {
        &self.resolution
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReleaseSet {
    Single(ReleaseRecord),
    Multi { releases: Vec<ReleaseRecord> },
}

/// Everything that will be released in this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextRelease {
    #[serde(flatten)]
    set: ReleaseSet,
    notes: String,
}

impl NextRelease {
    /// Returns `None` when there is nothing to release.
    pub fn new(mut records: Vec<ReleaseRecord>) -> Option<Self> {
        let set = match records.len() {
            0 => return None,
            1 => ReleaseSet::Single(records.remove(0)),
            _ => ReleaseSet::Multi { releases: records },
        };

        Some(Self {
            set,
            notes: String::new(),
        })
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.set, ReleaseSet::Multi { .. })
    }

    pub fn releases(&self) -> &[ReleaseRecord] {
        match &self.set {
            ReleaseSet::Single(record) => std::slice::from_ref(record),
            ReleaseSet::Multi { releases } => releases,
        }
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Appends a block of notes, separated from existing notes by a blank
    /// line. Empty input is ignored.
    pub fn append_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        if notes.is_empty() {
            return;
        }

        if !self.notes.is_empty() {
            self.notes.push_str("\n\n");
        }
        self.notes.push_str(notes);
    }
}

/// Owned by the orchestrator for one run and lent to each hook in turn.
#[derive(Debug)]
pub struct LifecycleContext {
    options: RunOptions,
    next_release: Option<NextRelease>,
    fields: BTreeMap<String, String>,
}

impl LifecycleContext {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            next_release: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn next_release(&self) -> Option<&NextRelease> {
        self.next_release.as_ref()
    }

    pub(crate) fn set_next_release(&mut self, next_release: NextRelease) {
        self.next_release = Some(next_release);
    }

    pub fn append_notes(&mut self, notes: &str) {
        if let Some(next_release) = self.next_release.as_mut() {
            next_release.append_notes(notes);
        }
    }

    /// Adds a plugin-provided value. Existing keys are never overwritten;
    /// returns whether the value was stored.
    pub fn insert_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let key = key.into();
        if self.fields.contains_key(&key) {
            return false;
        }
        self.fields.insert(key, value.into());
        true
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.as_str())
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}
