//! Location resolution via the direct geocoding endpoint
//!
//! Maps a place name and region code to coordinates. The provider ranks
//! candidates by relevance; only the first one is used.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::client::OpenWeatherClient;
use super::{Coordinates, Location};
use crate::error::ForecastError;

/// One candidate returned by the geocoding endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingCandidate {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Region (country) code
    #[serde(default)]
    pub country: String,
    /// Sub-region name, e.g. a US state
    #[serde(default)]
    pub state: Option<String>,
    /// Names in other languages, keyed by language code
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
}

impl From<&GeocodingCandidate> for Coordinates {
    fn from(candidate: &GeocodingCandidate) -> Self {
        Coordinates {
            latitude: candidate.lat,
            longitude: candidate.lon,
        }
    }
}

impl OpenWeatherClient {
    /// Looks up candidates for a location, in the provider's relevance order
    #[instrument(skip(self), fields(query = %location.query()))]
    pub async fn geocode(&self, location: &Location) -> Result<Vec<GeocodingCandidate>, ForecastError> {
        let url = format!("{}/direct", self.geo_base_url());
        let query = [
            ("q", location.query()),
            ("limit", self.geocode_limit().to_string()),
            ("appid", self.api_key().to_string()),
        ];

        let candidates: Vec<GeocodingCandidate> = self.get_json(&url, &query).await?;
        debug!(count = candidates.len(), "geocoding candidates received");
        Ok(candidates)
    }

    /// Resolves a location to the coordinates of its first geocoding candidate
    ///
    /// Fails with [`ForecastError::NotFound`] when there are no candidates.
    /// Never retries.
    pub async fn resolve(&self, location: &Location) -> Result<Coordinates, ForecastError> {
        let candidates = self.geocode(location).await?;

        let Some(first) = candidates.first() else {
            warn!(name = %location.name, region = %location.region_code, "no geocoding results");
            return Err(ForecastError::NotFound {
                name: location.name.clone(),
                region_code: location.region_code.clone(),
            });
        };

        let coordinates = Coordinates::from(first);
        info!(
            "Resolved {} to {} ({:.4}, {:.4})",
            location.query(),
            first.name,
            coordinates.latitude,
            coordinates.longitude
        );
        Ok(coordinates)
    }
}
