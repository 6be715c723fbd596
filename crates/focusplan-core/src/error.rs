//! Core error types for focusplan-core.
//!
//! This module defines the error hierarchy using thiserror
//! for better error handling and reporting across the library.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for focusplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Calendar gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors surfaced by a calendar gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Credential invalid or expired, and the single refresh-and-retry
    /// cycle did not recover it.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport or provider failure. Soft for event creation: the
    /// affected chunk is skipped and the run continues.
    #[error("Calendar API error: {0}")]
    Api(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// The caller asked to create an event outside its own declared
    /// working hours. A contract violation, not a runtime condition.
    #[error("Event [{start} - {end}) falls outside declared working hours")]
    OutsideWorkingHours {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Api(err.to_string())
    }
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
