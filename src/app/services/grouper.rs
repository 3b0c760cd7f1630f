//! Partitioning of long-format sample records by analysis key
//!
//! Builds the grouping map (key tuple → records) that the EMC calculator
//! reduces. Keys are ordered, so iteration over the map is deterministic and
//! result tables come out sorted by key.

use crate::app::models::{AnalysisLevel, GroupKey, SampleRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Records of each group, keyed by their projection onto an analysis level
pub type GroupedRecords = BTreeMap<GroupKey, Vec<SampleRecord>>;

/// Partition records by their key at `level`
///
/// Records within each group are sorted by timestamp ascending. The sort is
/// stable, so records sharing a timestamp keep their input order, and records
/// without a timestamp go last.
///
/// # Arguments
///
/// * `records` - Long-format records from the sample normaliser
/// * `level` - Analysis level whose dimensions form the key
pub fn group_records(
    records: impl IntoIterator<Item = SampleRecord>,
    level: AnalysisLevel,
) -> GroupedRecords {
    let mut groups: GroupedRecords = BTreeMap::new();

    for record in records {
        let key = GroupKey::for_record(&record, level);
        groups.entry(key).or_default().push(record);
    }

    for members in groups.values_mut() {
        sort_by_time(members);
    }

    debug!("Grouped records into {} {} groups", groups.len(), level);
    groups
}

/// Stable ascending sort by timestamp with missing timestamps last
pub fn sort_by_time(records: &mut [SampleRecord]) {
    records.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
