//! Tests for the roll-up aggregator


use crate::app::models::{AnalysisLevel, AreaKey, EmcResult, EmcTable, GroupKey, StormId, Unit};
use crate::app::services::emc_calculator::derive_rates;

/// Site-storm result row with rates derived from its totals
#[allow(clippy::too_many_arguments)]
pub fn site_storm_row(
    site: &str,
    storm: u32,
    season: &str,
    constituent: &str,
    area_km2: Option<f64>,
    mass_emitted_g: f64,
    liters_total: f64,
    days_elapsed: f64,
) -> EmcResult {
    let rates = derive_rates(
        Some(mass_emitted_g),
        Some(liters_total),
        Some(days_elapsed),
        area_km2,
    );

    EmcResult {
        key: GroupKey {
            site: Some(site.to_string()),
            storm: Some(StormId::Number(storm)),
            unit: Some(Unit::MgPerL),
            area_km2: area_km2.map(AreaKey),
            season: Some(season.to_string()),
            year: Some(2019),
            sample_type: Some("wet".to_string()),
            constituent: Some(constituent.to_string()),
        },
        samples: 3,
        area_km2,
        mass_emitted_g: Some(mass_emitted_g),
        liters_total: Some(liters_total),
        days_elapsed: Some(days_elapsed),
        emc_g_per_l: rates.emc_g_per_l,
        massload_kg_per_day: rates.massload_kg_per_day,
        fluxrate_kg_per_yr_per_km2: rates.fluxrate_kg_per_yr_per_km2,
    }
}

/// Two sites, two storms at ABC, one constituent plus a second at XYZ
pub fn site_storm_table() -> EmcTable {
    EmcTable::new(
        AnalysisLevel::SiteStorm,
        vec![
            site_storm_row("ABC", 1, "Winter", "TSS", Some(2.0), 100.0, 1_000.0, 0.5),
            site_storm_row("ABC", 2, "Summer", "TSS", Some(2.0), 10.0, 9_000.0, 1.5),
            site_storm_row("XYZ", 1, "Winter", "TSS", Some(4.0), 40.0, 2_000.0, 1.0),
            site_storm_row("XYZ", 1, "Winter", "Cu", Some(4.0), 0.2, 2_000.0, 1.0),
        ],
    )
}
