//! Dashboard session state and its transitions.
//!
//! All mutations go through [`Session::apply`], one event at a time. A
//! submission does not perform I/O itself: it returns an [`Effect::Fetch`]
//! that the host executes and later feeds back as [`Event::Settled`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    convert::{convert_for_target, convert_in_place},
    error::ProviderError,
    model::{CurrentConditions, ForecastPoint, RequestState, Snapshot, UnitSystem},
    sampler::sample,
};

/// How overlapping submissions are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupersedePolicy {
    /// Whichever fetch settles last determines the state.
    #[default]
    LastSettledWins,
    /// Outcomes of fetches superseded by a newer submission are dropped.
    LatestSubmitWins,
}

/// Behavior switches for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Re-apply the daily sampler to the held forecast after a unit change.
    pub resample_on_unit_change: bool,
    pub supersede: SupersedePolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { resample_on_unit_change: true, supersede: SupersedePolicy::LastSettledWins }
    }
}

/// Identifies one outstanding fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub location: String,
    /// Unit system captured when the query was submitted.
    pub unit: UnitSystem,
}

#[derive(Debug)]
pub enum Event {
    Submit { location: String },
    ChangeUnit(UnitSystem),
    Settled { ticket: QueryTicket, outcome: Result<Snapshot, ProviderError> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(QueryTicket),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    location: String,
    unit: UnitSystem,
    current: Option<CurrentConditions>,
    forecast: Vec<ForecastPoint>,
    request: RequestState,
    /// Unit system the held data was requested in.
    measured_unit: Option<UnitSystem>,
    latest_generation: u64,
    options: SessionOptions,
}

impl Session {
    pub fn new(unit: UnitSystem, options: SessionOptions) -> Self {
        Self { unit, options, ..Self::default() }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    /// `None` until the first successful submission.
    pub fn current(&self) -> Option<&CurrentConditions> {
        self.current.as_ref()
    }

    /// The sampled series; possibly empty.
    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn request_state(&self) -> &RequestState {
        &self.request
    }

    /// Unit the provider reported the held data in. Only temperatures
    /// follow later unit changes; wind speed stays in this unit.
    pub fn measured_unit(&self) -> Option<UnitSystem> {
        self.measured_unit
    }

    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Submit { location } => Some(Effect::Fetch(self.submit(location))),
            Event::ChangeUnit(unit) => {
                self.change_unit(unit);
                None
            }
            Event::Settled { ticket, outcome } => {
                self.settle(ticket, outcome);
                None
            }
        }
    }

    fn submit(&mut self, location: String) -> QueryTicket {
        self.latest_generation += 1;
        self.location = location.clone();
        self.request = RequestState::Loading;

        debug!(generation = self.latest_generation, %location, unit = %self.unit, "query submitted");

        QueryTicket { generation: self.latest_generation, location, unit: self.unit }
    }

    fn change_unit(&mut self, unit: UnitSystem) {
        if unit == self.unit {
            return;
        }
        self.unit = unit;

        convert_in_place(self.current.as_mut(), &mut self.forecast, unit);

        if self.options.resample_on_unit_change && !self.forecast.is_empty() {
            self.forecast = sample(&self.forecast);
        }

        debug!(%unit, points = self.forecast.len(), "unit changed");
    }

    fn settle(&mut self, ticket: QueryTicket, outcome: Result<Snapshot, ProviderError>) {
        if self.options.supersede == SupersedePolicy::LatestSubmitWins
            && ticket.generation != self.latest_generation
        {
            debug!(
                generation = ticket.generation,
                latest = self.latest_generation,
                "dropping superseded query outcome"
            );
            return;
        }

        match outcome {
            Ok(snapshot) => {
                let Snapshot { mut current, mut forecast } = snapshot;

                // The unit may have changed while the fetch was in flight.
                if ticket.unit != self.unit {
                    current.temperature = convert_for_target(current.temperature, self.unit);
                    convert_in_place(None, &mut forecast, self.unit);
                }

                info!(
                    generation = ticket.generation,
                    location = %ticket.location,
                    raw_points = forecast.len(),
                    "weather data received"
                );

                self.current = Some(current);
                self.measured_unit = Some(ticket.unit);
                self.forecast = sample(&forecast);
                self.request = RequestState::Succeeded;
            }
            Err(err) => {
                warn!(
                    generation = ticket.generation,
                    location = %ticket.location,
                    error = %err,
                    "weather query failed"
                );
                self.request = RequestState::Failed(err.user_message().to_string());
            }
        }
    }
}
