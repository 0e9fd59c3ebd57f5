//! Error types for the forecast pipeline
//!
//! Every failure inside the pipeline is a [`ForecastError`]. The outermost
//! orchestration boundary converts it into a [`FailureEnvelope`], which is the
//! only error shape callers of the service ever see.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while producing a forecast
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// Geocoding returned no candidates
    #[error("No location found for: {name}, {region_code}")]
    NotFound { name: String, region_code: String },

    /// Upstream call failed, either with a non-success status or at the network level
    #[error("{message}")]
    RequestFailed { message: String, code: Option<u16> },

    /// Response body could not be decoded into the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseFailed(String),

    /// Caller supplied an incomplete location
    #[error("{0}")]
    ValidationFailed(String),

    /// Anything else surfacing from within the pipeline
    #[error("{0}")]
    Unknown(String),
}

impl ForecastError {
    /// Upstream HTTP status, present only for non-success responses
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::ParseFailed(err.to_string());
        }
        Self::RequestFailed {
            message: format!("Request failed: {}", err),
            code: err.status().map(|s| s.as_u16()),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseFailed(err.to_string())
    }
}

/// Failure shape surfaced to callers of the orchestration layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEnvelope {
    pub message: String,
    /// Upstream HTTP status; absent when the failure was local
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl From<ForecastError> for FailureEnvelope {
    fn from(err: ForecastError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FailureEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for FailureEnvelope {}
