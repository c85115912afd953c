//! Core library for the `forecast` dashboard.
//!
//! This crate defines:
//! - Shared domain models (conditions, forecast points, request state)
//! - Abstraction over the weather provider, with an OpenWeather implementation
//! - Unit conversion and daily sampling of held data
//! - The session reducer and the query orchestrator driving it
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but any presentation layer that can emit
//! "submit" and "change unit" events can drive it.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod sampler;
pub mod session;

pub use config::Config;
pub use error::{FETCH_FAILED_MESSAGE, ProviderError};
pub use model::{
    CurrentConditions, ForecastPoint, ForecastSeries, RequestState, Snapshot, UnitSystem,
};
pub use orchestrator::{Dashboard, fetch_snapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{Effect, Event, QueryTicket, Session, SessionOptions, SupersedePolicy};
