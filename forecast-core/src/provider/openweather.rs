use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{Endpoint, ProviderError},
    model::{CurrentConditions, ForecastPoint, ForecastSeries, UnitSystem},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!(%endpoint, %url, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("appid", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, ProviderError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or(ProviderError::MissingCondition { endpoint: Endpoint::Current })?;

        Ok(CurrentConditions {
            location_name: self.name,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
            description: weather.description,
            icon: weather.icon,
            observed_at: self.dt.and_then(unix_to_utc),
        })
    }
}

impl OwForecastEntry {
    fn into_point(self) -> Result<ForecastPoint, ProviderError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or(ProviderError::MissingCondition { endpoint: Endpoint::Forecast })?;

        Ok(ForecastPoint {
            timestamp: self.dt,
            temperature: self.main.temp,
            description: weather.description,
            icon: weather.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        location: &str,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError> {
        let parsed: OwCurrentResponse = self
            .get_json(Endpoint::Current, &[("q", location), ("units", unit.as_str())])
            .await?;

        parsed.into_conditions()
    }

    async fn forecast(
        &self,
        location: &str,
        unit: UnitSystem,
        limit: u32,
    ) -> Result<ForecastSeries, ProviderError> {
        let cnt = limit.to_string();
        let parsed: OwForecastResponse = self
            .get_json(
                Endpoint::Forecast,
                &[("q", location), ("units", unit.as_str()), ("cnt", cnt.as_str())],
            )
            .await?;

        parsed.list.into_iter().map(OwForecastEntry::into_point).collect()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
