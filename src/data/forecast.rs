//! Raw 3-hour forecast retrieval
//!
//! This module fetches the 5-day/3-hour forecast for a pair of coordinates
//! and exposes the upstream response shape. Conversion into
//! [`ForecastSample`](super::ForecastSample)s happens in `transform::normalize`.

use serde::Deserialize;
use tracing::{info, instrument};

use super::client::OpenWeatherClient;
use super::Coordinates;
use crate::error::ForecastError;

/// Forecast response from the upstream API
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    /// Upstream status code, sent as a string
    #[serde(default)]
    pub cod: serde_json::Value,
    /// Number of samples in `list`
    #[serde(default)]
    pub cnt: u32,
    /// Samples in ascending time order, 3 hours apart
    pub list: Vec<RawSample>,
    pub city: RawCity,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    /// Forecast time as UTC epoch seconds
    pub dt: i64,
    pub main: RawMain,
    /// Condition list; the first entry is authoritative
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    #[serde(default)]
    pub clouds: Option<RawClouds>,
    pub wind: RawWind,
    /// Visibility in meters, omitted by the upstream at times
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Probability of precipitation as a fraction (0-1)
    #[serde(default)]
    pub pop: f64,
    /// Human-readable UTC timestamp, e.g. "2024-07-15 12:00:00"
    #[serde(default)]
    pub dt_txt: String,
}

/// Temperature block of a sample
#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    /// Pressure in hPa
    pub pressure: f64,
    /// Relative humidity percentage
    pub humidity: f64,
}

/// Weather condition entry of a sample
#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub id: u32,
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Cloud cover of a sample
#[derive(Debug, Clone, Deserialize)]
pub struct RawClouds {
    /// Cloudiness percentage
    pub all: u8,
}

/// Wind vector of a sample
#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    /// Wind speed in m/s
    pub speed: f64,
    /// Wind direction in degrees
    #[serde(default)]
    pub deg: f64,
}

/// Location block of the forecast response
#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    /// Offset from UTC in seconds
    pub timezone: i32,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

impl OpenWeatherClient {
    /// Fetches the raw 3-hour forecast for the given coordinates
    ///
    /// Exactly one request, metric units, no retries.
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<RawForecast, ForecastError> {
        let url = format!("{}/forecast", self.base_url());
        let query = [
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("appid", self.api_key().to_string()),
            ("units", "metric".to_string()),
        ];

        let forecast: RawForecast = self.get_json(&url, &query).await?;
        info!(
            "Fetched {} forecast samples for {:.4}, {:.4} (utc offset {}s)",
            forecast.list.len(),
            coordinates.latitude,
            coordinates.longitude,
            forecast.city.timezone
        );
        Ok(forecast)
    }
}
