//! Forecast transformation stages
//!
//! Pure functions that turn raw 3-hour samples into the hourly timeline and
//! the views derived from it:
//!
//! raw samples -> [`normalize`] -> [`interpolate`] -> { [`select_horizon`], [`summarize_days`] }

pub mod daily;
pub mod horizon;
pub mod interpolate;
pub mod normalize;

pub use daily::summarize_days;
pub use horizon::{select_horizon, HorizonWindow};
pub use interpolate::{interpolate_hourly, interpolate_wind_direction};
pub use normalize::{normalize_forecast, normalize_sample};

/// Rounds to the nearest integer, halves toward positive infinity
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to one decimal place, halves toward positive infinity
pub(crate) fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Rounds and clamps a percentage into 0-100
pub(crate) fn to_percent(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 100.0) as u8
}

/// Rounds a direction in degrees and normalizes it into 0-359
pub(crate) fn to_direction(degrees: f64) -> u16 {
    (round_half_up(degrees) as i64).rem_euclid(360) as u16
}
