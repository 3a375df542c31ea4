//! Ordered classification rules. The first rule whose predicate matches a
//! commit decides its category; commits matching no rule are ignored.
use serde::Serialize;
use strum::Display;

use crate::analyzer::commit::ParsedCommit;

/// Commit types that never trigger a release on their own.
pub const MAINTENANCE_TYPES: &[&str] =
    &["chore", "docs", "style", "refactor", "test", "ci", "build"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Feature,
    Fix,
    Breaking,
    Maintenance,
}

pub struct Rule {
    pub predicate: fn(&ParsedCommit) -> bool,
    pub category: Category,
    pub annotation: &'static str,
}

pub static RULES: &[Rule] = &[
    Rule {
        predicate: |c| c.kind == "feat" && !c.bang,
        category: Category::Feature,
        annotation: "feat",
    },
    Rule {
        predicate: |c| c.kind == "fix" && !c.bang,
        category: Category::Fix,
        annotation: "fix",
    },
    Rule {
        predicate: |c| c.kind == "perf" && !c.bang,
        category: Category::Fix,
        annotation: "perf",
    },
    Rule {
        predicate: |c| c.bang || c.breaking_footer,
        category: Category::Breaking,
        annotation: "breaking",
    },
    Rule {
        predicate: |c| MAINTENANCE_TYPES.contains(&c.kind.as_str()),
        category: Category::Maintenance,
        annotation: "chore",
    },
];

/// Returns the first matching rule for a commit.
pub fn match_rule(commit: &ParsedCommit) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.predicate)(commit))
}
