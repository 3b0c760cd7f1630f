use chrono::{Duration, FixedOffset, TimeZone};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use emc_processor::app::models::{AnalysisLevel, SampleRecord, StormId, Unit};
use emc_processor::app::services::emc_calculator::calculate_group_results;
use emc_processor::app::services::grouper::group_records;
use emc_processor::app::services::rollup::rollup_levels;

const CONSTITUENTS: [(&str, Unit); 4] = [
    ("TSS", Unit::MgPerL),
    ("TP", Unit::MgPerL),
    ("Cu", Unit::UgPerL),
    ("Zn", Unit::UgPerL),
];

/// Synthetic survey: `sites` sites with 6 storms each, 12 samples per storm
fn synthetic_records(sites: usize) -> Vec<SampleRecord> {
    let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    let start = offset.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
    let mut records = Vec::new();

    for site in 0..sites {
        for storm in 1..=6u32 {
            let storm_start = start + Duration::days(i64::from(storm) * 30);
            for step in 0..12i64 {
                let timestamp = storm_start + Duration::minutes(step * 15);
                for (name, unit) in CONSTITUENTS {
                    records.push(SampleRecord {
                        site: format!("S{:03}", site),
                        storm: StormId::Number(storm),
                        timestamp: Some(timestamp),
                        year: Some(2019),
                        sample_type: "wet".to_string(),
                        season: if storm < 4 { "Winter" } else { "Spring" }.to_string(),
                        flow_cms: Some(0.1 + step as f64 * 0.05),
                        area_km2: Some(1.0 + site as f64),
                        constituent: name.to_string(),
                        unit,
                        value: Some(10.0 + (step % 5) as f64),
                    });
                }
            }
        }
    }

    records
}

fn bench_site_storm(c: &mut Criterion) {
    let mut group = c.benchmark_group("site_storm_emc");

    for sites in [10, 100] {
        let records = synthetic_records(sites);
        group.bench_with_input(BenchmarkId::from_parameter(sites), &records, |b, records| {
            b.iter(|| {
                let groups = group_records(records.iter().cloned(), AnalysisLevel::SiteStorm);
                black_box(calculate_group_results(
                    &groups,
                    AnalysisLevel::SiteStorm,
                    None,
                ))
            })
        });
    }

    group.finish();
}

fn bench_rollups(c: &mut Criterion) {
    let groups = group_records(synthetic_records(100), AnalysisLevel::SiteStorm);
    let site_storm = calculate_group_results(&groups, AnalysisLevel::SiteStorm, None);

    c.bench_function("rollup_all_levels", |b| {
        b.iter(|| black_box(rollup_levels(&site_storm, &AnalysisLevel::ROLLUPS)))
    });
}

criterion_group!(benches, bench_site_storm, bench_rollups);
criterion_main!(benches);
