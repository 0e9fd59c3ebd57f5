//! Core data models for the forecast pipeline
//!
//! This module contains the location and forecast types shared by the
//! upstream clients, the transformation stages and the cache.

pub mod client;
pub mod forecast;
pub mod geocoding;
pub mod places;

pub use client::OpenWeatherClient;
pub use forecast::{RawForecast, RawSample};
pub use geocoding::GeocodingCandidate;
pub use places::{default_location, preset_locations};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A place to forecast, identified by name and region (country) code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable place name, e.g. "Los Angeles"
    pub name: String,
    /// Region code, e.g. "US"
    pub region_code: String,
}

impl Location {
    pub fn new(name: impl Into<String>, region_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region_code: region_code.into(),
        }
    }

    /// Cache identity: name and region joined verbatim, case-sensitive
    pub fn cache_key(&self) -> String {
        format!("{},{}", self.name, self.region_code)
    }

    /// Free-text geocoding query
    pub fn query(&self) -> String {
        if self.region_code.is_empty() {
            self.name.clone()
        } else {
            self.cache_key()
        }
    }

    /// Whether both name and region code are present
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.region_code.trim().is_empty()
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Representative weather condition of a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Coarse category, e.g. "Rain"
    pub category: String,
    /// Human-readable description, e.g. "light rain"
    pub description: String,
    /// Upstream icon id, e.g. "10d"
    pub icon: String,
}

/// One instant of the forecast timeline
///
/// `time` is wall-clock time at the forecast location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: i32,
    /// Feels-like temperature in Celsius
    pub feels_like: i32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Pressure in hPa
    pub pressure: i32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-359)
    pub wind_direction: u16,
    /// Visibility in meters
    pub visibility: i32,
    /// Probability of precipitation percentage (0-100)
    pub precipitation_probability: u8,
    pub condition: Condition,
}

/// Summary statistics for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temperature_min: i32,
    pub temperature_max: i32,
    /// Mean humidity, rounded
    pub humidity: u8,
    /// Mean pressure, rounded
    pub pressure: i32,
    /// Mean wind speed, rounded to one decimal
    pub wind_speed: f64,
    /// Highest precipitation probability of the day
    pub precipitation_probability: u8,
    /// Most frequent condition category of the day
    pub condition: Condition,
    /// Every sample of the day, in timeline order
    pub samples: Vec<ForecastSample>,
}

/// The result of one full pipeline run for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedForecast {
    pub location: Location,
    pub coordinates: Coordinates,
    /// Offset of the location's local time from UTC, in seconds
    pub timezone_offset: i32,
    /// Near-term hourly window
    pub hourly: Vec<ForecastSample>,
    /// Daily summaries, ascending by date
    pub daily: Vec<DailySummary>,
}
