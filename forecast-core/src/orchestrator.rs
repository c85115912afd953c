use tracing::debug;

use crate::{
    config::Config,
    error::ProviderError,
    model::{RequestState, Snapshot, UnitSystem},
    provider::{WeatherProvider, provider_from_config},
    session::{Effect, Event, QueryTicket, Session, SessionOptions},
};

/// Issues both lookups for `ticket` concurrently.
///
/// The first failure short-circuits the join; a partial result is never
/// returned.
pub async fn fetch_snapshot(
    provider: &dyn WeatherProvider,
    ticket: &QueryTicket,
    forecast_limit: u32,
) -> Result<Snapshot, ProviderError> {
    debug!(generation = ticket.generation, location = %ticket.location, "fetching snapshot");

    let (current, forecast) = tokio::try_join!(
        provider.current_conditions(&ticket.location, ticket.unit),
        provider.forecast(&ticket.location, ticket.unit, forecast_limit),
    )?;

    Ok(Snapshot { current, forecast })
}

/// A provider bound to one [`Session`].
#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    session: Session,
    forecast_limit: u32,
}

impl Dashboard {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        unit: UnitSystem,
        options: SessionOptions,
        forecast_limit: u32,
    ) -> Self {
        Self { provider, session: Session::new(unit, options), forecast_limit }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider, config.units, config.session_options(), config.forecast_limit))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs one submission to completion and returns the resulting state.
    pub async fn submit_query(&mut self, location: &str) -> &RequestState {
        let effect = self.session.apply(Event::Submit { location: location.to_string() });

        if let Some(Effect::Fetch(ticket)) = effect {
            let outcome = fetch_snapshot(self.provider.as_ref(), &ticket, self.forecast_limit).await;
            self.session.apply(Event::Settled { ticket, outcome });
        }

        self.session.request_state()
    }

    /// Re-expresses held data in `unit` without touching the network.
    pub fn change_unit(&mut self, unit: UnitSystem) {
        self.session.apply(Event::ChangeUnit(unit));
    }
}
