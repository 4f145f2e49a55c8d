//! Anime seasons and the mid-season membership test

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamServiceError};

/// A broadcast season
///
/// `Autumn` and `Fall` name the same season; both are accepted because
/// callers use either spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    Fall,
}

impl Season {
    /// Month and day standing in for the whole season
    fn midseason_month_day(self) -> (u32, u32) {
        match self {
            Season::Winter => (2, 15),
            Season::Spring => (5, 15),
            Season::Summer => (8, 15),
            Season::Autumn | Season::Fall => (11, 15),
        }
    }

    /// Midnight UTC on the representative day of this season in `year`
    ///
    /// Returns `None` only for years chrono cannot represent.
    pub fn midseason(self, year: i32) -> Option<DateTime<Utc>> {
        let (month, day) = self.midseason_month_day();
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Fall => "fall",
        }
    }
}

impl FromStr for Season {
    type Err = StreamServiceError;

    /// Parse a lowercase season name; matching is case-sensitive
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            "fall" => Ok(Season::Fall),
            other => Err(StreamServiceError::UnknownSeason(other.to_string())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a simulcast run covers the middle of the requested season.
///
/// `start_ms` and `end_ms` are epoch milliseconds. The check is strict on
/// both ends. Without a year or a season nothing is filtered out; with both,
/// a run missing either date is not considered airing.
///
/// # Examples
/// ```
/// use animelab_core::season::{is_airing_during_season, Season};
///
/// // 2021-01-01 .. 2021-03-31
/// let (start, end) = (Some(1_609_459_200_000), Some(1_617_148_800_000));
/// assert!(is_airing_during_season(start, end, Some(2021), Some(Season::Winter)));
/// assert!(!is_airing_during_season(start, end, Some(2021), Some(Season::Summer)));
/// assert!(is_airing_during_season(start, end, None, None));
/// ```
pub fn is_airing_during_season(
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    year: Option<i32>,
    season: Option<Season>,
) -> bool {
    let (Some(year), Some(season)) = (year, season) else {
        return true;
    };

    let (Some(start_ms), Some(end_ms)) = (start_ms, end_ms) else {
        return false;
    };

    let Some(midseason) = season.midseason(year) else {
        return false;
    };
    let midseason_ms = midseason.timestamp_millis();

    start_ms < midseason_ms && midseason_ms < end_ms
}
