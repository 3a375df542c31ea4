//! Conventional commit classification.
//!
//! Decides, per package, whether the commit log warrants a release and of
//! which type, keeping an annotated list of the commits that qualified.

use log::*;
use serde::Serialize;
use strum::Display;

use crate::{
    analyzer::{commit::ParsedCommit, rules::Category},
    vcs::CommitRecord,
    workspace::Package,
};

pub mod commit;
pub mod rules;

/// Release type derived from the strongest qualifying commit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

/// A commit that made it into a release, with its rule annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCommit {
    pub id: String,
    pub annotation: String,
    pub message: String,
}

/// Outcome of classifying one package's commits. Only ever constructed when
/// at least one commit qualified; absence is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAnalysis {
    pub should_release: bool,
    pub release_type: ReleaseType,
    pub has_breaking_change: bool,
    pub has_feature: bool,
    pub has_fix: bool,
    pub release_commits: Vec<ReleaseCommit>,
}

impl CommitAnalysis {
    /// Markdown bullet list of the qualifying commits.
    pub fn notes(&self) -> String {
        self.release_commits
            .iter()
            .map(|c| format!("- {}: {}", c.annotation, c.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Classifies commit logs using the ordered rules in [`rules::RULES`].
#[derive(Debug, Default, Clone)]
pub struct CommitClassifier;

impl CommitClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a newest-first commit log. When `package` is given, scoped
    /// commits only count if their scope is contained in the package's name
    /// or directory name; unscoped commits always count.
    pub fn classify(
        &self,
        commits: &[CommitRecord],
        package: Option<&Package>,
    ) -> Option<CommitAnalysis> {
        let mut has_breaking_change = false;
        let mut has_feature = false;
        let mut has_fix = false;
        let mut release_commits = vec![];

        for record in commits {
            let Some(parsed) = ParsedCommit::parse(record) else {
                debug!("skipping non-conventional commit {}", record.id);
                continue;
            };

            if package.is_some_and(|p| !scope_matches(parsed.scope.as_deref(), p))
            {
                continue;
            }

            let Some(rule) = rules::match_rule(&parsed) else {
                continue;
            };

            match rule.category {
                Category::Feature => has_feature = true,
                Category::Fix => has_fix = true,
                Category::Breaking => has_breaking_change = true,
                Category::Maintenance => continue,
            }

            release_commits.push(ReleaseCommit {
                id: parsed.id,
                annotation: rule.annotation.to_string(),
                message: parsed.description,
            });
        }

        if release_commits.is_empty() {
            return None;
        }

        let release_type = if has_breaking_change {
            ReleaseType::Major
        } else if has_feature {
            ReleaseType::Minor
        } else {
            ReleaseType::Patch
        };

        Some(CommitAnalysis {
            should_release: true,
            release_type,
            has_breaking_change,
            has_feature,
            has_fix,
            release_commits,
        })
    }
}

/// Unscoped commits belong to every package.
fn scope_matches(scope: Option<&str>, package: &Package) -> bool {
    match scope {
        None => true,
        Some(scope) => {
            package.name.contains(scope) || package.basename().contains(scope)
        }
    }
}
