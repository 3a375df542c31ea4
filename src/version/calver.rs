//! Calendar version values and year-month arithmetic.
use chrono::Datelike;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::{fmt::Display, sync::LazyLock};

use crate::version::format::VersionFormat;

static CALVER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<year>\d{2})\.(?<month>\d{2})\.(?<first>\d+)(?:\.(?<second>\d+))?$",
    )
    .unwrap()
});

/// Two-digit year and month pair used as the leading fields of every version.
///
/// Ordering is chronological, which for zero-padded fields is the same as
/// comparing the rendered `YY.MM` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: u32, month: u32) -> Self {
        Self { year, month }
    }

    /// Year-month of any chrono date, truncating the year to two digits.
    pub fn from_date(date: &impl Datelike) -> Self {
        Self {
            year: date.year().rem_euclid(100) as u32,
            month: date.month(),
        }
    }

    /// Year-month of the local wall clock.
    pub fn current() -> Self {
        Self::from_date(&chrono::Local::now())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}", self.year, self.month)
    }
}

/// A parsed calendar version in either the three or four part shape.
///
/// `minor` is only present for [`VersionFormat::FourPart`] versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalVer {
    pub year_month: YearMonth,
    pub minor: Option<u32>,
    pub patch: u32,
}

impl CalVer {
    /// Parses `YY.MM.PATCH` or `YY.MM.MINOR.PATCH`. Months outside 01-12 are
    /// rejected so that semantic versions like `1.2.3` do not pass as CalVer.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = CALVER_REGEX.captures(value.trim())?;

        let year = caps.name("year")?.as_str().parse::<u32>().ok()?;
        let month = caps.name("month")?.as_str().parse::<u32>().ok()?;

        if !(1..=12).contains(&month) {
            return None;
        }

        let first = caps.name("first")?.as_str().parse::<u32>().ok()?;

        let (minor, patch) = match caps.name("second") {
            Some(second) => (Some(first), second.as_str().parse::<u32>().ok()?),
            None => (None, first),
        };

        Some(Self {
            year_month: YearMonth::new(year, month),
            minor,
            patch,
        })
    }

    /// First release of a month in the given shape: `YY.MM.1` or `YY.MM.0.1`.
    pub fn first_of_month(year_month: YearMonth, format: VersionFormat) -> Self {
        match format {
            VersionFormat::ThreePart => Self {
                year_month,
                minor: None,
                patch: 1,
            },
            VersionFormat::FourPart => Self {
                year_month,
                minor: Some(0),
                patch: 1,
            },
        }
    }

    pub fn format(&self) -> VersionFormat {
        if self.minor.is_some() {
            VersionFormat::FourPart
        } else {
            VersionFormat::ThreePart
        }
    }
}

impl Display for CalVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.minor {
            Some(minor) => {
                write!(f, "{}.{}.{}", self.year_month, minor, self.patch)
            }
            None => write!(f, "{}.{}", self.year_month, self.patch),
        }
    }
}

impl Serialize for CalVer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
