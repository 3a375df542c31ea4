use log::*;
use serde::Serialize;

use crate::{
    analyzer::ReleaseType,
    version::{
        calver::{CalVer, YearMonth},
        format::VersionFormat,
    },
};

/// Next version for one package, plus the conditions that shaped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    pub version: CalVer,
    /// Target month was moved forward to the current month
    pub auto_rolled: bool,
    /// Declared version's month disagrees with the latest tag while month
    /// rolling is disabled
    pub manual_bump: bool,
    /// Tags of the other version shape exist for the target month
    pub mixed_formats: bool,
}

/// Computes next versions. The current month is injected so results only
/// depend on inputs.
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver {
    format: VersionFormat,
    auto_update_month: bool,
    today: YearMonth,
}

impl VersionResolver {
    pub fn new(
        format: VersionFormat,
        auto_update_month: bool,
        today: YearMonth,
    ) -> Self {
        Self {
            format,
            auto_update_month,
            today,
        }
    }

    pub fn format(&self) -> VersionFormat {
        self.format
    }

    /// Resolve the next version given the package's declared version and
    /// the CalVer tags already filtered to its scope.
    pub fn resolve(
        &self,
        release_type: ReleaseType,
        declared_version: Option<&str>,
        tags: &[CalVer],
    ) -> ResolvedVersion {
        let declared = declared_version.and_then(CalVer::parse);

        let (target, auto_rolled) = match declared {
            Some(declared)
                if self.auto_update_month
                    && self.today > declared.year_month =>
            {
                (self.today, true)
            }
            Some(declared) => (declared.year_month, false),
            None => (self.today, false),
        };

        let latest = tags.iter().max();

        let manual_bump = !self.auto_update_month
            && latest.is_some_and(|tag| tag.year_month != target);

        if manual_bump {
            debug!(
                "declared month {target} differs from latest tag month, starting new sequence"
            );
        }

        let same_month = tags.iter().filter(|t| t.year_month == target);

        let mixed_formats = same_month.clone().any(|t| t.format() != self.format);

        if mixed_formats {
            warn!(
                "tags in both version formats exist for {target}; only {} tags are considered",
                self.format
            );
        }

        let highest = same_month.filter(|t| t.format() == self.format).max();

        let version = match highest {
            Some(highest) if !manual_bump && !auto_rolled => {
                self.increment(highest, release_type)
            }
            _ => CalVer::first_of_month(target, self.format),
        };

        ResolvedVersion {
            version,
            auto_rolled,
            manual_bump,
            mixed_formats,
        }
    }

    fn increment(&self, current: &CalVer, release_type: ReleaseType) -> CalVer {
        match self.format {
            VersionFormat::ThreePart => CalVer {
                year_month: current.year_month,
                minor: None,
                patch: current.patch + 1,
            },
            VersionFormat::FourPart => {
                let minor = current.minor.unwrap_or(0);
                match release_type {
                    ReleaseType::Minor | ReleaseType::Major => CalVer {
                        year_month: current.year_month,
                        minor: Some(minor + 1),
                        patch: 1,
                    },
                    ReleaseType::Patch => CalVer {
                        year_month: current.year_month,
                        minor: Some(minor),
                        patch: current.patch + 1,
                    },
                }
            }
        }
    }
}
