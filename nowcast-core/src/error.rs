//! Error taxonomy for the fetch pipeline.
//!
//! Every variant here is recovered by [`crate::App`] and turned into the
//! error display state; none of them reach the user as a panic.

use thiserror::Error;

/// Failure to assemble a forecast window from a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("cannot read current hour from '{0}'")]
    Parse(String),

    #[error("current hour {0} is outside 0..=23")]
    HourOutOfRange(u32),

    #[error("expected at least 2 forecast days, got {0}")]
    MissingDays(usize),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    #[error("location access denied")]
    PermissionDenied,

    #[error("geolocation is not supported")]
    Unsupported,
}

/// Failure anywhere between issuing a query and holding a decoded snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("weather service returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode weather response: {0}")]
    Decode(String),

    #[error(transparent)]
    Geolocation(#[from] GeoError),
}

impl FetchError {
    /// Text for the error region.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => {
                "Unable to reach the weather service. Check your connection.".to_string()
            }
            FetchError::Timeout => "The weather service took too long to respond.".to_string(),
            FetchError::Http { .. } => "City not found or API error".to_string(),
            FetchError::Decode(_) => "Received malformed weather data.".to_string(),
            FetchError::Geolocation(GeoError::PermissionDenied) => {
                "Location access denied. Please search manually.".to_string()
            }
            FetchError::Geolocation(GeoError::Unsupported) => {
                "Geolocation is not supported on this device.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

impl WindowError {
    pub fn user_message(&self) -> String {
        format!("Weather data was malformed: {self}")
    }
}
