//! Ratio-of-sums roll-up
//!
//! Finer result rows sharing a coarser key have their area, mass, volume,
//! duration and sample count summed, and the three rates are derived again
//! from those sums. The finer rates themselves are never averaged, so mass
//! balance holds at every level.

use crate::app::models::{AnalysisLevel, EmcResult, EmcTable, GroupKey};
use crate::app::services::emc_calculator::derive_rates;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Running sums of the finer rows under one coarser key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollupTotals {
    pub rows: usize,
    pub samples: usize,
    area_km2: Option<f64>,
    area_incomplete: bool,
    mass_emitted_g: Option<f64>,
    liters_total: Option<f64>,
    days_elapsed: Option<f64>,
}

impl RollupTotals {
    /// Fold one finer row into the totals
    pub fn add(&mut self, row: &EmcResult) {
        self.rows += 1;
        self.samples += row.samples;

        match row.area_km2 {
            Some(area) => self.area_km2 = Some(self.area_km2.unwrap_or_default() + area),
            None => self.area_incomplete = true,
        }
        self.mass_emitted_g = add_skipping_null(self.mass_emitted_g, row.mass_emitted_g);
        self.liters_total = add_skipping_null(self.liters_total, row.liters_total);
        self.days_elapsed = add_skipping_null(self.days_elapsed, row.days_elapsed);
    }

    /// Summed area, null when any contributing row lacked one
    pub fn area_km2(&self) -> Option<f64> {
        if self.area_incomplete {
            None
        } else {
            self.area_km2
        }
    }

    /// Result row for `key` with rates re-derived from the sums
    pub fn into_result(self, key: GroupKey) -> EmcResult {
        let area_km2 = self.area_km2();
        let rates = derive_rates(
            self.mass_emitted_g,
            self.liters_total,
            self.days_elapsed,
            area_km2,
        );

        EmcResult {
            key,
            samples: self.samples,
            area_km2,
            mass_emitted_g: self.mass_emitted_g,
            liters_total: self.liters_total,
            days_elapsed: self.days_elapsed,
            emc_g_per_l: rates.emc_g_per_l,
            massload_kg_per_day: rates.massload_kg_per_day,
            fluxrate_kg_per_yr_per_km2: rates.fluxrate_kg_per_yr_per_km2,
        }
    }
}

fn add_skipping_null(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(total), Some(value)) => Some(total + value),
        (None, value) => value,
        (total, None) => total,
    }
}

/// Re-aggregate `table` at the coarser `level`
///
/// Rolling a table up to its own level regroups nothing and returns rows
/// with the same sums.
pub fn rollup(table: &EmcTable, level: AnalysisLevel) -> EmcTable {
    if !level
        .dimensions()
        .iter()
        .all(|dimension| table.level.has_dimension(*dimension))
    {
        warn!(
            "Rolling {} results up to {}, which keys on dimensions the source lacks",
            table.level, level
        );
    }

    let mut totals: BTreeMap<GroupKey, RollupTotals> = BTreeMap::new();
    for row in &table.rows {
        totals.entry(row.key.project(level)).or_default().add(row);
    }

    let rows: Vec<EmcResult> = totals
        .into_iter()
        .map(|(key, totals)| totals.into_result(key))
        .collect();

    debug!(
        "Rolled {} {} rows up to {} {} rows",
        table.len(),
        table.level,
        rows.len(),
        level
    );
    EmcTable::new(level, rows)
}

/// Roll `table` up to each of `levels` independently
pub fn rollup_levels(table: &EmcTable, levels: &[AnalysisLevel]) -> Vec<EmcTable> {
    levels.iter().map(|level| rollup(table, *level)).collect()
}
