//! Failure of a remote lookup.
//!
//! Every variant is the same failure from the caller's point of view. The
//! variants only exist so logs can say what actually went wrong.

use std::fmt;

use thiserror::Error;

/// Message surfaced through [`crate::RequestState::Failed`].
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Which of the two provider lookups failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    /// Path segment below the provider base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Current => f.write_str("current weather"),
            Endpoint::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("OpenWeather {endpoint} response contained no weather condition")]
    MissingCondition { endpoint: Endpoint },
}

impl ProviderError {
    /// The message shown to the user, identical for every failure.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}
