use crate::{
    Config, CurrentConditions, ForecastSeries, UnitSystem, error::ProviderError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Remote source of current conditions and forecast series.
///
/// Both lookups must be issued with the same unit system so the returned
/// temperatures are already expressed in it.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        location: &str,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError>;

    /// At most `limit` points of the 3-hour series, in chronological order.
    async fn forecast(
        &self,
        location: &str,
        unit: UnitSystem,
        limit: u32,
    ) -> Result<ForecastSeries, ProviderError>;
}

/// Construct the provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    provider_with_key(config, config.api_key())
}

fn provider_with_key(
    config: &Config,
    api_key: Option<String>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `forecast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::with_base_url(api_key, config.base_url());
    Ok(Box::new(provider))
}
