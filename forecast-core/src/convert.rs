//! Unit conversion of held temperatures.
//!
//! The formula is chosen by the *target* unit alone: switching to imperial
//! always applies C→F and switching to metric always applies F→C to whatever
//! value is stored. Results are kept to two decimal places.

use crate::model::{CurrentConditions, ForecastPoint, UnitSystem};

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts `value` with the formula whose output unit is `target`.
pub fn convert_for_target(value: f64, target: UnitSystem) -> f64 {
    let converted = match target {
        UnitSystem::Imperial => celsius_to_fahrenheit(value),
        UnitSystem::Metric => fahrenheit_to_celsius(value),
    };
    round_to_hundredths(converted)
}

/// Rewrites every held temperature towards `target`.
pub fn convert_in_place(
    current: Option<&mut CurrentConditions>,
    series: &mut [ForecastPoint],
    target: UnitSystem,
) {
    if let Some(current) = current {
        current.temperature = convert_for_target(current.temperature, target);
    }

    for point in series.iter_mut() {
        point.temperature = convert_for_target(point.temperature, target);
    }
}
