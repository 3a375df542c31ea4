//! Calendar versioning: version shapes, tag naming, and next-version
//! resolution.

pub mod calver;
pub mod format;
pub mod resolver;
pub mod tag;

pub use calver::{CalVer, YearMonth};
pub use format::{VersionFormat, VersionFormatSetting, resolve_version_format};
pub use resolver::{ResolvedVersion, VersionResolver};
pub use tag::{ReleaseTag, parse_tag, tag_name, tags_for_package};
