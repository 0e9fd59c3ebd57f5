//! skycast library
//!
//! Turns a provider's 3-hour forecast into an hourly timeline, a near-term
//! hourly window and per-day summaries, with a short-lived in-memory cache
//! per location. The binary is a thin CLI over [`service::ForecastService`];
//! the modules are public for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod service;
pub mod transform;

pub use cache::{CachedData, ForecastCache};
pub use config::ForecastConfig;
pub use data::{CombinedForecast, Location};
pub use error::{FailureEnvelope, ForecastError};
pub use service::ForecastService;
pub use transform::HorizonWindow;
