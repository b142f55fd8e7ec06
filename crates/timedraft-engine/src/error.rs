//! Error types for availability computation.

use thiserror::Error;

/// Shown when the user declines calendar access.
pub const AUTHORIZATION_MESSAGE: &str =
    "Calendar access is required to fetch your availability. Please grant permission and try again.";

/// Shown for any failure reported by the calendar service.
pub const FETCH_FAILURE_MESSAGE: &str = "Unable to fetch calendar data. Please try again later.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// Start date after end date, or missing/malformed custom dates.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// The date range and weekday filter together yield no working days.
    #[error("No valid days found in the selected date range")]
    EmptyWindowSet,

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A weekday number outside 1..=7. `0` marks an empty selection.
    #[error("Invalid weekday: {0} (expected 1=Monday through 7=Sunday)")]
    InvalidWeekday(u8),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid range preset: {0}")]
    InvalidPreset(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    /// Opaque failure reported by the busy-interval source.
    #[error("Calendar fetch failed: {0}")]
    UpstreamFetch(String),

    /// The credential was rejected or consent was not granted.
    #[error("Authorization failed: {0}")]
    Authorization(String),
}

impl AvailabilityError {
    /// Copy suitable for showing to the person requesting availability.
    ///
    /// Collaborator failures collapse to fixed messages; validation errors
    /// keep their detail since they describe the user's own input.
    pub fn user_message(&self) -> String {
        match self {
            AvailabilityError::Authorization(_) => AUTHORIZATION_MESSAGE.to_string(),
            AvailabilityError::UpstreamFetch(_) => FETCH_FAILURE_MESSAGE.to_string(),
            AvailabilityError::EmptyWindowSet => {
                "No valid days found in the selected date range.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
