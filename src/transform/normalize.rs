//! Raw sample normalization
//!
//! Converts upstream samples into [`ForecastSample`]s in location-local time.

use chrono::{DateTime, Duration};

use super::{round_half_up, to_direction, to_percent};
use crate::data::forecast::{RawForecast, RawSample};
use crate::data::{Condition, ForecastSample};
use crate::error::ForecastError;

/// Visibility assumed when the upstream omits it (its maximum reported value)
pub const DEFAULT_VISIBILITY_METERS: i32 = 10_000;

/// Largest gap between consecutive samples accepted from the upstream
pub const MAX_SAMPLE_GAP_HOURS: i64 = 24;

/// Normalizes a single raw sample
///
/// `timezone_offset` is the location's offset from UTC in seconds. The first
/// entry of the raw condition list is taken as the sample's condition.
pub fn normalize_sample(raw: &RawSample, timezone_offset: i32) -> Result<ForecastSample, ForecastError> {
    let time = raw
        .dt
        .checked_add(i64::from(timezone_offset))
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| ForecastError::ParseFailed(format!("timestamp {} out of range", raw.dt)))?;

    let condition = raw
        .weather
        .first()
        .map(|w| Condition {
            category: w.main.clone(),
            description: w.description.clone(),
            icon: w.icon.clone(),
        })
        .ok_or_else(|| ForecastError::ParseFailed(format!("sample {} has no weather condition", raw.dt)))?;

    Ok(ForecastSample {
        time,
        temperature: round_half_up(raw.main.temp) as i32,
        feels_like: round_half_up(raw.main.feels_like) as i32,
        humidity: to_percent(raw.main.humidity),
        pressure: round_half_up(raw.main.pressure) as i32,
        wind_speed: raw.wind.speed,
        wind_direction: to_direction(raw.wind.deg),
        visibility: raw
            .visibility
            .map(|v| round_half_up(v) as i32)
            .unwrap_or(DEFAULT_VISIBILITY_METERS),
        precipitation_probability: to_percent(raw.pop * 100.0),
        condition,
    })
}

/// Normalizes every sample of a forecast response, keeping upstream order
///
/// Consecutive samples more than [`MAX_SAMPLE_GAP_HOURS`] apart fail with
/// [`ForecastError::ParseFailed`], which bounds the interpolated timeline.
pub fn normalize_forecast(raw: &RawForecast) -> Result<Vec<ForecastSample>, ForecastError> {
    let samples = raw
        .list
        .iter()
        .map(|sample| normalize_sample(sample, raw.city.timezone))
        .collect::<Result<Vec<_>, _>>()?;

    for pair in samples.windows(2) {
        let gap = pair[1].time - pair[0].time;
        if gap > Duration::hours(MAX_SAMPLE_GAP_HOURS) {
            return Err(ForecastError::ParseFailed(format!(
                "samples at {} and {} are more than {} hours apart",
                pair[0].time, pair[1].time, MAX_SAMPLE_GAP_HOURS
            )));
        }
    }

    Ok(samples)
}
