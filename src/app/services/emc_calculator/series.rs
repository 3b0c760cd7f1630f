//! Per-sample series of a time-ordered group

use crate::constants::{FIRST_SAMPLE_MINUTES, LITERS_PER_MINUTE_PER_CMS};
use chrono::{DateTime, FixedOffset};

/// Minutes each sample stands for
///
/// The first sample always counts for [`FIRST_SAMPLE_MINUTES`]; every later
/// sample counts for the gap since its predecessor. `timestamps` must be
/// non-decreasing.
pub fn elapsed_minutes(timestamps: &[DateTime<FixedOffset>]) -> Vec<f64> {
    let mut elapsed = Vec::with_capacity(timestamps.len());

    if !timestamps.is_empty() {
        elapsed.push(FIRST_SAMPLE_MINUTES);
    }
    for pair in timestamps.windows(2) {
        let delta = pair[1] - pair[0];
        elapsed.push(delta.num_milliseconds() as f64 / 60_000.0);
    }

    elapsed
}

/// Volume passing the outfall over each sample's interval, in litres
pub fn liters_per_interval(flows_cms: &[f64], elapsed_minutes: &[f64]) -> Vec<f64> {
    flows_cms
        .iter()
        .zip(elapsed_minutes)
        .map(|(flow, minutes)| flow * LITERS_PER_MINUTE_PER_CMS * minutes)
        .collect()
}

/// Largest value reached by the running sum of `values`
///
/// Equals the plain total when no value is negative. `None` for an empty
/// series.
pub fn max_cumulative_sum(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .scan(0.0, |running, value| {
            *running += value;
            Some(*running)
        })
        .reduce(f64::max)
}
