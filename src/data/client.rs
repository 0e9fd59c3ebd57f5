//! HTTP client for the OpenWeatherMap-compatible APIs
//!
//! Owns the `reqwest` client, the credential and the endpoint base URLs. The
//! geocoding and forecast calls live in their own modules and share
//! [`OpenWeatherClient::get_json`] for status handling and decoding.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::error::ForecastError;

/// User agent sent with every request
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Client for the geocoding and forecast endpoints
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    geo_base_url: String,
    geocode_limit: u32,
}

impl OpenWeatherClient {
    /// Creates a client from a validated configuration
    pub fn new(config: &ForecastConfig) -> Result<Self, ForecastError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ForecastError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, config))
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(http_client: Client, config: &ForecastConfig) -> Self {
        Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            geo_base_url: config.geo_base_url.clone(),
            geocode_limit: config.geocode_limit,
        }
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn geo_base_url(&self) -> &str {
        &self.geo_base_url
    }

    pub(crate) fn geocode_limit(&self) -> u32 {
        self.geocode_limit
    }

    /// Issues a GET and decodes the JSON body
    ///
    /// Non-success responses become [`ForecastError::RequestFailed`] with the
    /// status code; undecodable bodies become [`ForecastError::ParseFailed`].
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ForecastError> {
        debug!(url, "sending request");

        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url, status = status.as_u16(), "upstream returned an error");
            return Err(ForecastError::RequestFailed {
                message: format!("API request failed: {} - {}", status, body),
                code: Some(status.as_u16()),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
