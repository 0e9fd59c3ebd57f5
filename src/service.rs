//! Forecast orchestration
//!
//! [`ForecastService`] wires the upstream client, the transformation stages
//! and the cache into one pipeline per location:
//!
//! validate -> cache lookup -> resolve -> fetch -> normalize -> interpolate
//! -> { horizon, daily } -> store
//!
//! Failures short-circuit the remaining stages and nothing is cached for
//! them. [`ForecastService::forecast_envelope`] is the outermost boundary and
//! is the only place where errors become [`FailureEnvelope`]s.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CachedData, ForecastCache};
use crate::data::{CombinedForecast, Location, OpenWeatherClient};
use crate::error::{FailureEnvelope, ForecastError};
use crate::transform::{interpolate_hourly, normalize_forecast, select_horizon, summarize_days, HorizonWindow};

const INVALID_LOCATION: &str = "Valid city with name and country is required";

/// Runs the forecast pipeline for locations, reusing fresh cached results
#[derive(Debug, Clone)]
pub struct ForecastService {
    client: OpenWeatherClient,
    cache: Arc<ForecastCache>,
    window: HorizonWindow,
}

impl ForecastService {
    pub fn new(client: OpenWeatherClient, cache: Arc<ForecastCache>, window: HorizonWindow) -> Self {
        Self { client, cache, window }
    }

    pub fn window(&self) -> HorizonWindow {
        self.window
    }

    pub fn cache(&self) -> &Arc<ForecastCache> {
        &self.cache
    }

    /// Produces the combined forecast for a location
    ///
    /// Serves the cached result if it was fetched less than ten minutes
    /// before `now`. Otherwise runs the whole pipeline and caches the result;
    /// the returned `cached_at` is then `now`.
    #[instrument(skip(self), fields(key = %location.cache_key()))]
    pub async fn forecast(
        &self,
        location: &Location,
        now: DateTime<Utc>,
    ) -> Result<CachedData<CombinedForecast>, ForecastError> {
        if !location.is_complete() {
            warn!("rejecting incomplete location");
            return Err(ForecastError::ValidationFailed(INVALID_LOCATION.to_string()));
        }

        let key = location.cache_key();
        if let Some(cached) = self.cache.lookup(&key, now) {
            debug!("serving cached forecast");
            return Ok(cached);
        }

        let combined = self.run_pipeline(location, now).await?;
        self.cache.store(&key, combined.clone(), now);
        info!(
            "Forecast ready for {}: {} hourly samples, {} days",
            key,
            combined.hourly.len(),
            combined.daily.len()
        );

        Ok(CachedData {
            data: combined,
            cached_at: now,
            from_cache: false,
        })
    }

    async fn run_pipeline(&self, location: &Location, now: DateTime<Utc>) -> Result<CombinedForecast, ForecastError> {
        let coordinates = self.client.resolve(location).await?;
        let raw = self.client.fetch_forecast(coordinates).await?;
        let timezone_offset = raw.city.timezone;

        let samples = normalize_forecast(&raw)?;
        let timeline = interpolate_hourly(&samples);
        debug!(
            raw = samples.len(),
            hourly = timeline.len(),
            "interpolated timeline"
        );

        let hourly = select_horizon(&timeline, timezone_offset, now, self.window);
        let daily = summarize_days(&timeline);

        Ok(CombinedForecast {
            location: location.clone(),
            coordinates,
            timezone_offset,
            hourly,
            daily,
        })
    }

    /// Discards the cached entry for a location and fetches it again
    pub async fn refresh(
        &self,
        location: &Location,
        now: DateTime<Utc>,
    ) -> Result<CachedData<CombinedForecast>, ForecastError> {
        self.cache.invalidate(&location.cache_key());
        self.forecast(location, now).await
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Like [`forecast`](Self::forecast), with every failure converted to a [`FailureEnvelope`]
    pub async fn forecast_envelope(
        &self,
        location: &Location,
        now: DateTime<Utc>,
    ) -> Result<CachedData<CombinedForecast>, FailureEnvelope> {
        self.forecast(location, now).await.map_err(FailureEnvelope::from)
    }

    /// Forecasts several locations concurrently
    ///
    /// Returns one result per input, in input order. Duplicate locations are
    /// not coalesced.
    pub async fn forecast_many(
        &self,
        locations: &[Location],
        now: DateTime<Utc>,
    ) -> Vec<Result<CachedData<CombinedForecast>, FailureEnvelope>> {
        join_all(locations.iter().map(|location| self.forecast_envelope(location, now))).await
    }
}
