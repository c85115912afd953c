//! Reduction of a 3-hour forecast series to one point per day.

/// Points per day in a 3-hour series.
pub const SAMPLING_STRIDE: usize = 8;

/// Keeps the entries at indices 0, 8, 16, … of `series`.
///
/// Applied to whatever it is given. Feeding it an already sampled series
/// reduces it again.
pub fn sample<T: Clone>(series: &[T]) -> Vec<T> {
    series.iter().step_by(SAMPLING_STRIDE).cloned().collect()
}
