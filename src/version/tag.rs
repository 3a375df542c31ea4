//! Tag naming for released versions.
//!
//! Unscoped (single package) tags look like `v-25.07.3`; tags scoped to a
//! monorepo package look like `v-25.07.3-core-release`.
use crate::version::calver::CalVer;

pub const TAG_PREFIX: &str = "v-";
pub const SCOPED_TAG_SUFFIX: &str = "-release";

/// A tag name that was recognised as a release of some package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: CalVer,
    /// Package name for scoped tags, `None` for unscoped tags.
    pub package: Option<String>,
}

/// Builds the tag name for a version, scoped to `package` when given.
pub fn tag_name(version: &str, package: Option<&str>) -> String {
    match package {
        Some(name) => {
            format!("{TAG_PREFIX}{version}-{name}{SCOPED_TAG_SUFFIX}")
        }
        None => format!("{TAG_PREFIX}{version}"),
    }
}

/// Parses a tag name produced by [`tag_name`]. Returns `None` for tags that
/// do not carry a CalVer version.
pub fn parse_tag(name: &str) -> Option<ReleaseTag> {
    let rest = name.strip_prefix(TAG_PREFIX)?;

    let (version, package) = match rest.strip_suffix(SCOPED_TAG_SUFFIX) {
        Some(scoped) => match scoped.split_once('-') {
            Some((version, package)) if !package.is_empty() => {
                (version, Some(package.to_string()))
            }
            _ => return None,
        },
        None => (rest, None),
    };

    let version = CalVer::parse(version)?;

    Some(ReleaseTag {
        name: name.to_string(),
        version,
        package,
    })
}

/// Filters tag names down to the releases belonging to one package scope,
/// preserving input order. `None` selects unscoped tags.
pub fn tags_for_package(tags: &[String], package: Option<&str>) -> Vec<ReleaseTag> {
    tags.iter()
        .filter_map(|t| parse_tag(t))
        .filter(|t| t.package.as_deref() == package)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::format::VersionFormat;

    #[test]
    fn builds_unscoped_and_scoped_names() {
        assert_eq!(tag_name("25.07.3", None), "v-25.07.3");
        assert_eq!(
            tag_name("25.07.0.1", Some("core")),
            "v-25.07.0.1-core-release"
        );
    }

    #[test]
    fn parses_scoped_tag_with_hyphenated_package() {
        let tag = parse_tag("v-25.07.2-design-system-release").unwrap();
        assert_eq!(tag.version.to_string(), "25.07.2");
        assert_eq!(tag.package.as_deref(), Some("design-system"));
    }

    #[test]
    fn ignores_foreign_tags() {
        assert!(parse_tag("v1.2.3").is_none());
        assert!(parse_tag("v-1.2.3").is_none());
        assert!(parse_tag("release-25.07.1").is_none());
        assert!(parse_tag("v-25.07.1-release").is_none());
    }

    #[test]
    fn generated_tag_round_trips_to_same_package_and_format() {
        for (version, package) in [
            ("25.08.1", None),
            ("25.08.0.1", None),
            ("25.08.4", Some("ui")),
            ("25.08.2.7", Some("@acme/core")),
        ] {
            let name = tag_name(version, package);
            let parsed = tags_for_package(&[name.clone()], package);
            assert_eq!(parsed.len(), 1, "{name} was not recognised");
            assert_eq!(parsed[0].version.to_string(), version);

            let expected = if version.split('.').count() == 4 {
                VersionFormat::FourPart
            } else {
                VersionFormat::ThreePart
            };
            assert_eq!(parsed[0].version.format(), expected);
        }
    }

    #[test]
    fn filters_tags_by_scope() {
        let tags = vec![
            "v-25.07.3".to_string(),
            "v-25.07.2-core-release".to_string(),
            "v-25.07.1-ui-release".to_string(),
            "v0.1.0".to_string(),
        ];

        let core = tags_for_package(&tags, Some("core"));
        assert_eq!(core.len(), 1);
        assert_eq!(core[0].name, "v-25.07.2-core-release");

        let unscoped = tags_for_package(&tags, None);
        assert_eq!(unscoped.len(), 1);
        assert_eq!(unscoped[0].name, "v-25.07.3");
    }
}
