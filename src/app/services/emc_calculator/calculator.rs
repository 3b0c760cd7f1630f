//! Per-group mass balance and derived rates
//!
//! A group's usable samples (value, timestamp and flow all present) are put in
//! time order and integrated:
//!
//! 1. litres per interval = flow × 60 000 × elapsed minutes
//! 2. mass per interval = litres × concentration, converted to grams by unit
//! 3. mass emitted = largest running total of the interval masses
//! 4. litres total = sum of interval litres
//! 5. days elapsed = last timestamp − first timestamp
//!
//! The three rates are then derived by [`derive_rates`]. Every division is
//! guarded: a zero, missing or non-finite denominator yields `None`.

use super::series::{elapsed_minutes, liters_per_interval, max_cumulative_sum};
use crate::app::models::{AnalysisLevel, EmcResult, EmcTable, GroupKey, SampleRecord};
use crate::app::services::grouper::GroupedRecords;
use crate::constants::{DAYS_PER_YEAR, G_TO_KG, SECONDS_PER_DAY};
use indicatif::ProgressBar;
use tracing::debug;

/// Rates derived from summed mass, volume, duration and area
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedRates {
    pub emc_g_per_l: Option<f64>,
    pub massload_kg_per_day: Option<f64>,
    pub fluxrate_kg_per_yr_per_km2: Option<f64>,
}

/// Flow-weighted mean concentration in g/L
pub fn emc_ratio(mass_emitted_g: Option<f64>, liters_total: Option<f64>) -> Option<f64> {
    guarded_divide(mass_emitted_g?, liters_total?)
}

/// Mass loading rate in kg/day
pub fn massload(mass_emitted_g: Option<f64>, days_elapsed: Option<f64>) -> Option<f64> {
    guarded_divide(mass_emitted_g? * G_TO_KG, days_elapsed?)
}

/// Area-normalised flux rate in kg/yr/km2
pub fn fluxrate(massload_kg_per_day: Option<f64>, area_km2: Option<f64>) -> Option<f64> {
    guarded_divide(massload_kg_per_day? * DAYS_PER_YEAR, area_km2?)
}

/// Derive all three rates from the underlying totals
pub fn derive_rates(
    mass_emitted_g: Option<f64>,
    liters_total: Option<f64>,
    days_elapsed: Option<f64>,
    area_km2: Option<f64>,
) -> DerivedRates {
    let massload_kg_per_day = massload(mass_emitted_g, days_elapsed);
    DerivedRates {
        emc_g_per_l: emc_ratio(mass_emitted_g, liters_total),
        massload_kg_per_day,
        fluxrate_kg_per_yr_per_km2: fluxrate(massload_kg_per_day, area_km2),
    }
}

fn guarded_divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// EMC result of one group
///
/// Records that cannot take part in the mass balance are discarded first. A
/// group left empty produces a row of nulls; a single sample yields mass,
/// volume and EMC but no loading or flux, since no time has elapsed.
pub fn calculate_emc(key: &GroupKey, records: &[SampleRecord]) -> EmcResult {
    let area_km2 = key
        .area_km2
        .map(|area| area.0)
        .or_else(|| records.iter().find_map(|record| record.area_km2));

    let mut usable: Vec<&SampleRecord> = records.iter().filter(|r| r.is_usable()).collect();
    usable.sort_by_key(|record| record.timestamp);

    let mut timestamps = Vec::with_capacity(usable.len());
    let mut flows = Vec::with_capacity(usable.len());
    for record in &usable {
        if let (Some(timestamp), Some(flow)) = (record.timestamp, record.flow_cms) {
            timestamps.push(timestamp);
            flows.push(flow);
        }
    }

    if timestamps.is_empty() {
        return EmcResult {
            key: key.clone(),
            samples: 0,
            area_km2,
            mass_emitted_g: None,
            liters_total: None,
            days_elapsed: None,
            emc_g_per_l: None,
            massload_kg_per_day: None,
            fluxrate_kg_per_yr_per_km2: None,
        };
    }

    let elapsed = elapsed_minutes(&timestamps);
    let liters = liters_per_interval(&flows, &elapsed);
    let mass_g: Vec<f64> = usable
        .iter()
        .zip(&liters)
        .map(|(record, liters)| {
            liters * record.value.unwrap_or_default() * record.unit.grams_factor()
        })
        .collect();

    let mass_emitted_g = max_cumulative_sum(&mass_g);
    let liters_total = Some(liters.iter().sum());
    let days_elapsed = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => Some((*last - *first).num_seconds() as f64 / SECONDS_PER_DAY),
        _ => None,
    };

    let rates = derive_rates(mass_emitted_g, liters_total, days_elapsed, area_km2);

    EmcResult {
        key: key.clone(),
        samples: timestamps.len(),
        area_km2,
        mass_emitted_g,
        liters_total,
        days_elapsed,
        emc_g_per_l: rates.emc_g_per_l,
        massload_kg_per_day: rates.massload_kg_per_day,
        fluxrate_kg_per_yr_per_km2: rates.fluxrate_kg_per_yr_per_km2,
    }
}

/// Reduce every group to its EMC result
///
/// Rows come out in key order.
///
/// # Arguments
///
/// * `groups` - Grouping map from [`group_records`](crate::app::services::grouper::group_records)
/// * `level` - Level the groups were keyed at
/// * `progress_bar` - Optional progress bar advanced once per group
pub fn calculate_group_results(
    groups: &GroupedRecords,
    level: AnalysisLevel,
    progress_bar: Option<&ProgressBar>,
) -> EmcTable {
    let mut rows = Vec::with_capacity(groups.len());

    for (key, records) in groups {
        let result = calculate_emc(key, records);
        if result.samples == 0 {
            debug!("Group {} has no usable samples", key.label());
        }
        rows.push(result);

        if let Some(pb) = progress_bar {
            pb.inc(1);
        }
    }

    debug!("Calculated {} {} results", rows.len(), level);
    EmcTable::new(level, rows)
}
