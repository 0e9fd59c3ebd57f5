//! Near-term window selection for the hourly view

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::ForecastSample;

/// Hours covered by the default window
pub const DEFAULT_HORIZON_HOURS: u32 = 12;

/// Policy deciding which samples make up the hourly view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonWindow {
    /// From local now up to N hours ahead
    NextHours(u32),
    /// From local now to the end of the current local day
    RestOfDay,
}

impl Default for HorizonWindow {
    fn default() -> Self {
        Self::NextHours(DEFAULT_HORIZON_HOURS)
    }
}

impl HorizonWindow {
    /// Inclusive bounds of the window in location-local time
    pub fn bounds(&self, local_now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let end = match self {
            Self::NextHours(hours) => local_now + Duration::hours(i64::from(*hours)),
            Self::RestOfDay => local_now.date().and_time(end_of_day()),
        };
        (local_now, end)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

impl fmt::Display for HorizonWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextHours(hours) => write!(f, "next-{}h", hours),
            Self::RestOfDay => write!(f, "rest-of-day"),
        }
    }
}

impl FromStr for HorizonWindow {
    type Err = String;

    /// Parses `next-<N>h` or `rest-of-day`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "rest-of-day" || normalized == "today" {
            return Ok(Self::RestOfDay);
        }

        normalized
            .strip_prefix("next-")
            .and_then(|rest| rest.strip_suffix('h'))
            .and_then(|hours| hours.parse::<u32>().ok())
            .filter(|hours| *hours > 0)
            .map(Self::NextHours)
            .ok_or_else(|| format!("Invalid window '{}'. Valid windows: next-<N>h, rest-of-day", s))
    }
}

/// Selects the samples inside the window, bounds inclusive
///
/// `now` is converted to location-local time with `timezone_offset` seconds.
pub fn select_horizon(
    samples: &[ForecastSample],
    timezone_offset: i32,
    now: DateTime<Utc>,
    window: HorizonWindow,
) -> Vec<ForecastSample> {
    let local_now = now.naive_utc() + Duration::seconds(i64::from(timezone_offset));
    let (start, end) = window.bounds(local_now);

    samples
        .iter()
        .filter(|s| s.time >= start && s.time <= end)
        .cloned()
        .collect()
}
