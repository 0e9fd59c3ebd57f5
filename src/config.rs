//! Runtime configuration
//!
//! Holds the API credential, upstream endpoints and pipeline settings. The
//! credential is mandatory: building a config without one fails before any
//! client is created.

use thiserror::Error;

use crate::transform::HorizonWindow;

/// Default base URL of the forecast API
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default base URL of the geocoding API
pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Number of geocoding candidates requested
pub const DEFAULT_GEOCODE_LIMIT: u32 = 5;

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Errors raised while building the configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No API key was supplied
    #[error("OpenWeatherMap API key is required. Please set the OPENWEATHER_API_KEY environment variable.")]
    MissingApiKey,

    /// A base URL is not an HTTP(S) URL
    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    /// A numeric setting is out of range
    #[error("Invalid setting: {0}")]
    OutOfRange(String),
}

/// Configuration for the forecast client and service
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub api_key: String,
    pub base_url: String,
    pub geo_base_url: String,
    pub geocode_limit: u32,
    pub timeout_seconds: u64,
    pub window: HorizonWindow,
    /// Maximum number of cached locations; `None` means unbounded
    pub cache_capacity: Option<usize>,
}

impl ForecastConfig {
    /// Creates a config with default endpoints for the given API key
    ///
    /// Fails with [`ConfigError::MissingApiKey`] if the key is absent or blank.
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            geocode_limit: DEFAULT_GEOCODE_LIMIT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            window: HorizonWindow::default(),
            cache_capacity: None,
        })
    }

    /// Points both upstream endpoints at custom base URLs
    pub fn with_base_urls(mut self, base_url: impl Into<String>, geo_base_url: impl Into<String>) -> Self {
        self.base_url = trim_slash(base_url.into());
        self.geo_base_url = trim_slash(geo_base_url.into());
        self
    }

    pub fn with_window(mut self, window: HorizonWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Validates all settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.base_url, &self.geo_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        if self.geocode_limit == 0 {
            return Err(ConfigError::OutOfRange(
                "geocode limit must be at least 1".to_string(),
            ));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::OutOfRange(format!(
                "timeout must be between 1 and {} seconds",
                MAX_TIMEOUT_SECONDS
            )));
        }

        if self.cache_capacity == Some(0) {
            return Err(ConfigError::OutOfRange(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
