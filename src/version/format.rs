//! Selection between the two supported version shapes.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Plugin identifiers containing this marker publish to a package registry
/// that expects a flat, semantic-version shaped `X.Y.Z` string.
pub const REGISTRY_PLUGIN_MARKER: &str = "npm";

/// Version shape used for every package in a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum VersionFormat {
    /// `YY.MM.PATCH`
    #[strum(serialize = "YY.MM.PATCH")]
    ThreePart,
    /// `YY.MM.MINOR.PATCH`
    #[strum(serialize = "YY.MM.MINOR.PATCH")]
    FourPart,
}

/// Configured version format. `Auto` defers to the plugin list.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VersionFormatSetting {
    #[default]
    Auto,
    #[serde(alias = "YY.MM.PATCH")]
    #[strum(serialize = "three-part", serialize = "YY.MM.PATCH")]
    ThreePart,
    #[serde(alias = "YY.MM.MINOR.PATCH")]
    #[strum(serialize = "four-part", serialize = "YY.MM.MINOR.PATCH")]
    FourPart,
}

/// Picks the version shape for a run. An explicit setting always wins;
/// otherwise a registry-publishing plugin forces the three part shape and
/// everything else gets four parts.
pub fn resolve_version_format(
    setting: VersionFormatSetting,
    plugins: &[String],
) -> VersionFormat {
    match setting {
        VersionFormatSetting::ThreePart => VersionFormat::ThreePart,
        VersionFormatSetting::FourPart => VersionFormat::FourPart,
        VersionFormatSetting::Auto => {
            if plugins.iter().any(|p| p.contains(REGISTRY_PLUGIN_MARKER)) {
                VersionFormat::ThreePart
            } else {
                VersionFormat::FourPart
            }
        }
    }
}
