//! Cache module for combined forecasts
//!
//! This module provides a time-boxed, in-memory cache keyed by location
//! identity. Entries are served for ten minutes after they were fetched and
//! are ignored (not evicted) once stale, until a new fetch overwrites them.

mod manager;

pub use manager::{CachedData, ForecastCache, CACHE_FRESHNESS};
