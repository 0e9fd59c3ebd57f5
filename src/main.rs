//! skycast - Hourly and daily weather forecasts for cities
//!
//! Resolves each requested location, fetches its 3-hour forecast, and prints
//! the near-term hourly window plus per-day summaries.

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skycast::cache::{CachedData, ForecastCache};
use skycast::cli::{Cli, StartupConfig};
use skycast::data::{CombinedForecast, OpenWeatherClient};
use skycast::error::FailureEnvelope;
use skycast::service::ForecastService;

/// Installs the stderr log subscriber; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "skycast=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_text(result: &CachedData<CombinedForecast>) {
    let forecast = &result.data;
    let source = if result.from_cache { "cached" } else { "fetched" };

    println!(
        "{}, {} ({:.4}, {:.4}) - {} {} UTC",
        forecast.location.name,
        forecast.location.region_code,
        forecast.coordinates.latitude,
        forecast.coordinates.longitude,
        source,
        result.cached_at.format("%Y-%m-%d %H:%M"),
    );

    println!("  Hourly:");
    if forecast.hourly.is_empty() {
        println!("    (no samples in window)");
    }
    for sample in &forecast.hourly {
        println!(
            "    {}  {:>3}°C (feels {:>3}°C)  {:>3}% rain  {:>4.1} m/s {:>3}°  {}",
            sample.time.format("%a %H:%M"),
            sample.temperature,
            sample.feels_like,
            sample.precipitation_probability,
            sample.wind_speed,
            sample.wind_direction,
            sample.condition.description,
        );
    }

    println!("  Daily:");
    for day in &forecast.daily {
        println!(
            "    {}  {:>3}..{:>3}°C  {:>3}% rain  {:>3}% hum  {:>4} hPa  {:>4.1} m/s  {}",
            day.date.format("%a %b %d"),
            day.temperature_min,
            day.temperature_max,
            day.precipitation_probability,
            day.humidity,
            day.pressure,
            day.wind_speed,
            day.condition.category,
        );
    }
}

fn print_json(results: &[Result<CachedData<CombinedForecast>, FailureEnvelope>]) -> serde_json::Result<()> {
    let values: Vec<serde_json::Value> = results
        .iter()
        .map(|result| match result {
            Ok(cached) => serde_json::json!({
                "forecast": cached.data,
                "cached_at": cached.cached_at,
                "from_cache": cached.from_cache,
            }),
            Err(envelope) => serde_json::json!({ "error": envelope }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match OpenWeatherClient::new(&startup.config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Arc::new(match startup.config.cache_capacity {
        Some(capacity) => ForecastCache::with_capacity(capacity),
        None => ForecastCache::new(),
    });
    let service = ForecastService::new(client, cache, startup.config.window);

    let results = service.forecast_many(&startup.locations, Utc::now()).await;

    if startup.json {
        if let Err(e) = print_json(&results) {
            eprintln!("Error: failed to serialize output: {}", e);
            return ExitCode::FAILURE;
        }
    } else {
        for (location, result) in startup.locations.iter().zip(&results) {
            match result {
                Ok(cached) => print_text(cached),
                Err(envelope) => eprintln!("{}: {}", location.cache_key(), envelope),
            }
            println!();
        }
    }

    if results.iter().any(Result::is_err) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
