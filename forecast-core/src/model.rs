use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/w";

/// Measurement convention requested from the provider and used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Celsius, metres per second.
    #[default]
    Metric,
    /// Fahrenheit, miles per hour.
    Imperial,
}

impl UnitSystem {
    /// Value of the provider's `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(UnitSystem::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported values: metric, imperial."
            )),
        }
    }
}

/// Snapshot of the current conditions at the queried location.
///
/// `temperature` is always expressed in the session's active [`UnitSystem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: f64,
    pub description: String,
    pub icon: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl CurrentConditions {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }
}

/// One entry of the provider's 3-hour forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastPoint {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }
}

/// Chronological, as received from the provider.
pub type ForecastSeries = Vec<ForecastPoint>;

/// Lifecycle marker of the most recent query submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Both lookups of one submission, joined.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}.png")
}
