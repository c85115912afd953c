//! Plain-text rendering of a dashboard session.

use std::fmt::Write;

use forecast_core::{CurrentConditions, ForecastPoint, RequestState, Session, UnitSystem};

const DATE_FORMAT: &str = "%a, %b %-d";

pub fn session(session: &Session) -> String {
    let mut out = String::new();
    let unit = session.unit();

    match session.request_state() {
        RequestState::Loading => out.push_str("Loading...\n"),
        RequestState::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
        RequestState::Idle | RequestState::Succeeded => {}
    }

    if let Some(current) = session.current() {
        let wind_unit = session.measured_unit().unwrap_or(unit);
        out.push_str(&current_block(current, unit, wind_unit));
    }

    if !session.forecast().is_empty() {
        out.push_str(&forecast_block(session.forecast(), unit));
    }

    out
}

/// Temperatures follow `unit`; wind speed is never converted and keeps the
/// unit it was fetched in.
fn current_block(current: &CurrentConditions, unit: UnitSystem, wind_unit: UnitSystem) -> String {
    let mut out = String::new();
    let heading = if current.location_name.is_empty() {
        "Current Weather".to_string()
    } else {
        format!("Current Weather in {}", current.location_name)
    };

    let _ = writeln!(out, "{heading}");
    let _ = writeln!(
        out,
        "  {:.2}{}  {}",
        current.temperature,
        unit.temperature_symbol(),
        current.description
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {} {}  Pressure {} hPa",
        current.humidity,
        current.wind_speed,
        wind_unit.wind_speed_label(),
        current.pressure
    );
    let _ = writeln!(out, "  {}", current.icon_url());
    out
}

fn forecast_block(points: &[ForecastPoint], unit: UnitSystem) -> String {
    let mut out = String::from("5-Day Forecast\n");

    for point in points {
        let date = point
            .time()
            .map(|t| t.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "--".to_string());
        let _ = writeln!(
            out,
            "  {date:<12} {:>8.2}{}  {:<24} {}",
            point.temperature,
            unit.temperature_symbol(),
            point.description,
            point.icon_url()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{
        Effect, Event, FETCH_FAILED_MESSAGE, ProviderError, Snapshot, error::Endpoint,
    };

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            location_name: "London".into(),
            temperature: 12.5,
            humidity: 81,
            wind_speed: 4.1,
            pressure: 1012.0,
            description: "light rain".into(),
            icon: "10d".into(),
            observed_at: None,
        }
    }

    #[test]
    fn current_block_uses_unit_labels() {
        let text = current_block(&conditions(), UnitSystem::Imperial, UnitSystem::Imperial);

        assert!(text.starts_with("Current Weather in London\n"));
        assert!(text.contains("12.50°F  light rain"));
        assert!(text.contains("Humidity 81%  Wind 4.1 mph  Pressure 1012 hPa"));
        assert!(text.contains("https://openweathermap.org/img/w/10d.png"));
    }

    #[test]
    fn forecast_block_formats_dates_in_utc() {
        // 2023-11-14T22:13:20Z
        let point = ForecastPoint {
            timestamp: 1_700_000_000,
            temperature: 7.0,
            description: "clear sky".into(),
            icon: "01n".into(),
        };

        let text = forecast_block(&[point], UnitSystem::Metric);

        assert!(text.starts_with("5-Day Forecast\n"));
        assert!(text.contains("Tue, Nov 14"));
        assert!(text.contains("7.00°C  clear sky"));
        assert!(text.contains("https://openweathermap.org/img/w/01n.png"));
    }

    #[test]
    fn wind_keeps_fetched_unit_after_unit_change() {
        let mut session = Session::default();
        let ticket = match session.apply(Event::Submit { location: "London".into() }) {
            Some(Effect::Fetch(ticket)) => ticket,
            other => panic!("expected fetch effect, got {other:?}"),
        };
        let snapshot = Snapshot { current: conditions(), forecast: Vec::new() };
        session.apply(Event::Settled { ticket, outcome: Ok(snapshot) });

        session.apply(Event::ChangeUnit(UnitSystem::Imperial));
        let text = super::session(&session);

        assert!(text.contains("54.50°F  light rain"));
        assert!(text.contains("Wind 4.1 m/s"));
        assert!(!text.contains("mph"));
    }

    #[test]
    fn failed_session_shows_message_above_stale_data() {
        let mut session = Session::default();
        let ticket = match session.apply(Event::Submit { location: "London".into() }) {
            Some(Effect::Fetch(ticket)) => ticket,
            other => panic!("expected fetch effect, got {other:?}"),
        };
        let snapshot = Snapshot { current: conditions(), forecast: Vec::new() };
        session.apply(Event::Settled { ticket, outcome: Ok(snapshot) });

        let Some(Effect::Fetch(ticket)) = session.apply(Event::Submit { location: "Nowhere".into() })
        else {
            panic!("expected fetch effect");
        };
        let err = ProviderError::MissingCondition { endpoint: Endpoint::Current };
        session.apply(Event::Settled { ticket, outcome: Err(err) });

        let text = super::session(&session);
        assert!(text.starts_with(FETCH_FAILED_MESSAGE));
        assert!(text.contains("Current Weather in London"));
    }

    #[test]
    fn idle_session_renders_nothing() {
        assert_eq!(session(&Session::default()), "");
    }
}
