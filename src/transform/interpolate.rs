//! Temporal interpolation of 3-hour samples into an hourly timeline

use chrono::Duration;

use super::{round_half_up, round_tenth, to_direction, to_percent};
use crate::data::ForecastSample;

/// Linear interpolation between two values
fn lerp(from: f64, to: f64, factor: f64) -> f64 {
    from + (to - from) * factor
}

/// Interpolates a direction in degrees along the shortest arc
///
/// The result is normalized into `[0, 360)`; e.g. halfway between 350° and
/// 10° is 0°, not 180°.
pub fn interpolate_wind_direction(from: f64, to: f64, factor: f64) -> f64 {
    let from = from.rem_euclid(360.0);
    let to = to.rem_euclid(360.0);

    let mut diff = to - from;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }

    let result = (from + diff * factor).rem_euclid(360.0);
    // rem_euclid can yield exactly 360.0 for tiny negative inputs
    if result >= 360.0 {
        0.0
    } else {
        result
    }
}

/// Synthesizes the sample `hours` after `a` on the way to `b`
fn interpolate_between(a: &ForecastSample, b: &ForecastSample, hours: i64) -> ForecastSample {
    let time = a.time + Duration::hours(hours);
    let span = (b.time - a.time).num_milliseconds() as f64;
    let factor = (time - a.time).num_milliseconds() as f64 / span;

    let int = |from: i32, to: i32| round_half_up(lerp(f64::from(from), f64::from(to), factor)) as i32;
    let pct = |from: u8, to: u8| to_percent(lerp(f64::from(from), f64::from(to), factor));

    ForecastSample {
        time,
        temperature: int(a.temperature, b.temperature),
        feels_like: int(a.feels_like, b.feels_like),
        humidity: pct(a.humidity, b.humidity),
        pressure: int(a.pressure, b.pressure),
        wind_speed: round_tenth(lerp(a.wind_speed, b.wind_speed, factor)),
        wind_direction: to_direction(interpolate_wind_direction(
            f64::from(a.wind_direction),
            f64::from(b.wind_direction),
            factor,
        )),
        visibility: int(a.visibility, b.visibility),
        precipitation_probability: pct(a.precipitation_probability, b.precipitation_probability),
        // Categorical data is not blended; take the nearer neighbour
        condition: if factor < 0.5 {
            a.condition.clone()
        } else {
            b.condition.clone()
        },
    }
}

/// Fills the gaps between consecutive samples with hourly samples
///
/// For each consecutive pair more than one hour apart, `floor(hours) - 1`
/// samples are synthesized at whole hours after the first. Input samples
/// are kept unchanged; fewer than two samples are returned as-is.
pub fn interpolate_hourly(samples: &[ForecastSample]) -> Vec<ForecastSample> {
    let Some(last) = samples.last() else {
        return Vec::new();
    };
    if samples.len() < 2 {
        return samples.to_vec();
    }

    let mut hourly = Vec::with_capacity(samples.len() * 3);

    for pair in samples.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        hourly.push(a.clone());

        let hours_between = (b.time - a.time).num_milliseconds() as f64 / 3_600_000.0;
        if hours_between > 1.0 {
            let missing = hours_between.floor() as i64 - 1;
            hourly.extend((1..=missing).map(|h| interpolate_between(a, b, h)));
        }
    }

    hourly.push(last.clone());
    hourly
}
