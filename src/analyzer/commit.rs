use git_conventional::Commit as ConventionalCommit;
use regex::Regex;
use std::sync::LazyLock;

use crate::vcs::CommitRecord;

/// Lenient header matcher used when the full message is not strictly
/// conventional (e.g. a body without the separating blank line).
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<type>[A-Za-z]+)(?:\((?<scope>[^()]*)\))?(?<bang>!)?:\s*(?<desc>.*)$",
    )
    .unwrap()
});

/// Matches a breaking change footer anywhere after the header.
static BREAKING_FOOTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^BREAKING[ -]CHANGE:").unwrap());

/// Conventional commit fields the classifier cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub id: String,
    /// Lower-cased commit type token
    pub kind: String,
    pub scope: Option<String>,
    /// `!` after the type or scope
    pub bang: bool,
    /// `BREAKING CHANGE:` or `BREAKING-CHANGE:` footer
    pub breaking_footer: bool,
    pub description: String,
    pub header: String,
}

impl ParsedCommit {
    /// Parse a commit record. Returns `None` for messages that do not follow
    /// the conventional commit header shape at all.
    pub fn parse(record: &CommitRecord) -> Option<Self> {
        let raw = record.message.trim();
        let header = raw.lines().next().unwrap_or_default().trim().to_string();
        let breaking_footer = BREAKING_FOOTER_REGEX.is_match(raw);

        if let Ok(cc) = ConventionalCommit::parse(raw) {
            return Some(Self {
                id: record.id.clone(),
                kind: cc.type_().as_str().to_lowercase(),
                scope: cc.scope().map(|s| s.to_string()),
                bang: header_has_bang(&header),
                breaking_footer,
                description: cc.description().to_string(),
                header,
            });
        }

        let caps = HEADER_REGEX.captures(&header)?;

        Some(Self {
            id: record.id.clone(),
            kind: caps.name("type")?.as_str().to_lowercase(),
            scope: caps
                .name("scope")
                .map(|s| s.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            bang: caps.name("bang").is_some(),
            breaking_footer,
            description: caps
                .name("desc")
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
            header: header.clone(),
        })
    }
}

fn header_has_bang(header: &str) -> bool {
    HEADER_REGEX
        .captures(header)
        .map(|caps| caps.name("bang").is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str) -> CommitRecord {
        CommitRecord {
            id: "abc123".into(),
            message: message.into(),
        }
    }

    #[test]
    fn parses_scoped_feature() {
        let parsed = ParsedCommit::parse(&record("feat(core): add cache")).unwrap();
        assert_eq!(parsed.kind, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("core"));
        assert!(!parsed.bang);
        assert!(!parsed.breaking_footer);
        assert_eq!(parsed.description, "add cache");
        assert_eq!(parsed.header, "feat(core): add cache");
    }

    #[test]
    fn detects_bang_marker() {
        let parsed = ParsedCommit::parse(&record("refactor(api)!: drop v1")).unwrap();
        assert_eq!(parsed.kind, "refactor");
        assert!(parsed.bang);
    }

    #[test]
    fn detects_breaking_footer() {
        let parsed = ParsedCommit::parse(&record(
            "chore: bump runtime\n\nBREAKING-CHANGE: node 18 required",
        ))
        .unwrap();
        assert!(parsed.breaking_footer);
        assert!(!parsed.bang);
    }

    #[test]
    fn falls_back_to_header_for_sloppy_bodies() {
        let parsed =
            ParsedCommit::parse(&record("Fix: handle nulls\nno blank line here"))
                .unwrap();
        assert_eq!(parsed.kind, "fix");
        assert_eq!(parsed.description, "handle nulls");
    }

    #[test]
    fn rejects_non_conventional_messages() {
        assert!(ParsedCommit::parse(&record("Merge branch 'main'")).is_none());
        assert!(ParsedCommit::parse(&record("updated readme")).is_none());
    }
}
