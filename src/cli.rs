//! Command-line interface parsing for skycast
//!
//! This module handles parsing of CLI arguments using clap, including the
//! `Name,CC` location arguments, the horizon window policy and the API
//! credential (taken from the environment when not given as a flag).

use clap::Parser;
use thiserror::Error;

use crate::config::{ConfigError, ForecastConfig, DEFAULT_BASE_URL, DEFAULT_GEO_BASE_URL};
use crate::data::{default_location, preset_locations, Location};
use crate::transform::HorizonWindow;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// A location argument is not of the form `Name,CC`
    #[error("Invalid location: '{0}'. Expected NAME,COUNTRY_CODE, e.g. \"Los Angeles,US\"")]
    InvalidLocation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// skycast - Hourly and daily weather forecasts from 3-hour upstream data
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Hourly and daily weather forecasts for cities")]
#[command(version)]
pub struct Cli {
    /// Locations to forecast, as NAME,COUNTRY_CODE
    ///
    /// Examples:
    ///   skycast "Los Angeles,US"
    ///   skycast "Rio de Janeiro,BR" "Beijing,CN"
    #[arg(value_name = "LOCATION", value_parser = parse_location_arg)]
    pub locations: Vec<Location>,

    /// Forecast every preset location
    #[arg(long, conflicts_with = "locations")]
    pub all: bool,

    /// Hourly window: next-<N>h or rest-of-day
    #[arg(long, value_name = "WINDOW", default_value = "next-12h")]
    pub window: HorizonWindow,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of cached locations
    #[arg(long, value_name = "N")]
    pub cache_capacity: Option<usize>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the forecast API
    #[arg(long, env = "OPENWEATHER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Base URL of the geocoding API
    #[arg(long, env = "OPENWEATHER_GEO_URL", default_value = DEFAULT_GEO_BASE_URL)]
    pub geo_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses a `Name,CC` argument into a [`Location`]
///
/// The split happens at the last comma, so names may contain commas.
pub fn parse_location_arg(s: &str) -> Result<Location, CliError> {
    let (name, region_code) = s
        .rsplit_once(',')
        .map(|(name, code)| (name.trim(), code.trim()))
        .filter(|(name, code)| !name.is_empty() && !code.is_empty())
        .ok_or_else(|| CliError::InvalidLocation(s.to_string()))?;

    Ok(Location::new(name, region_code))
}

/// Everything the binary needs to start, derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub config: ForecastConfig,
    /// Locations to forecast, in output order
    pub locations: Vec<Location>,
    pub json: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments
    ///
    /// Fails if the API key is missing or a setting is invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = ForecastConfig::new(cli.api_key.clone())?
            .with_base_urls(cli.base_url.as_str(), cli.geo_url.as_str())
            .with_window(cli.window)
            .with_cache_capacity(cli.cache_capacity);
        config.validate()?;

        let locations = if cli.all {
            preset_locations()
        } else if cli.locations.is_empty() {
            vec![default_location()]
        } else {
            cli.locations.clone()
        };

        Ok(Self {
            config,
            locations,
            json: cli.json,
        })
    }
}
