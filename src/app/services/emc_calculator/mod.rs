//! Event mean concentration calculation
//!
//! The time-integrated mass balance applied to each group of samples, and the
//! guarded ratio formulas shared with the roll-up aggregator.
//!
//! - [`series`] - per-sample elapsed time, volume and cumulative mass
//! - [`calculator`] - one [`EmcResult`](crate::app::models::EmcResult) per group

pub mod calculator;
pub mod series;

#[cfg(test)]
pub mod tests;

pub use calculator::{
    DerivedRates, calculate_emc, calculate_group_results, derive_rates, emc_ratio, fluxrate,
    massload,
};
pub use series::{elapsed_minutes, liters_per_interval, max_cumulative_sum};
