//! Tests for the watershed table normaliser

use super::watershed_frame;
use crate::Error;
use crate::app::models::DataIssue;
use crate::app::services::watershed_normalizer::normalize_watershed;
use crate::config::{ConflictPolicy, WatershedConfig};

#[test]
fn test_normalize_strips_suffixes_and_corrects_typo() {
    let df = watershed_frame(&[
        (Some("ABC1"), Some("2.5")),
        (Some("USJ"), Some("10")),
        (Some("XYZ"), Some("0.75")),
    ]);

    let result = normalize_watershed(&df, &WatershedConfig::default()).unwrap();

    assert_eq!(result.rows_in, 3);
    assert_eq!(result.rows_dropped, 0);
    assert_eq!(result.table.len(), 3);
    assert_eq!(result.table.area("ABC"), Some(2.5));
    assert_eq!(result.table.area("USJC"), Some(10.0));
    assert_eq!(result.table.area("USJ"), None);
    assert_eq!(result.table.area("XYZ"), Some(0.75));
    assert!(result.issues.is_empty());
}

#[test]
fn test_normalize_drops_incomplete_and_non_numeric_rows() {
    let df = watershed_frame(&[
        (Some("ABC"), None),
        (None, Some("3.0")),
        (Some("DEF"), Some("unknown")),
        (Some("GHI"), Some("4.0")),
    ]);

    let result = normalize_watershed(&df, &WatershedConfig::default()).unwrap();

    assert_eq!(result.rows_dropped, 3);
    assert_eq!(result.table.len(), 1);
    assert!(result.table.contains("GHI"));
}

#[test]
fn test_identical_duplicates_collapse_silently() {
    let df = watershed_frame(&[(Some("ABC1"), Some("2.5")), (Some("ABC2"), Some("2.5"))]);

    let result = normalize_watershed(&df, &WatershedConfig::default()).unwrap();

    assert_eq!(result.table.len(), 1);
    assert_eq!(result.table.area("ABC"), Some(2.5));
    assert!(result.issues.is_empty());
}

#[test]
fn test_conflicting_duplicates_discarded_by_default() {
    let df = watershed_frame(&[
        (Some("ABC1"), Some("2.5")),
        (Some("ABC2"), Some("3.5")),
        (Some("DEF"), Some("1.0")),
    ]);

    let result = normalize_watershed(&df, &WatershedConfig::default()).unwrap();

    assert_eq!(result.table.area("ABC"), None);
    assert_eq!(result.table.area("DEF"), Some(1.0));
    assert_eq!(result.issues.len(), 1);
    match &result.issues[0] {
        DataIssue::AmbiguousWatershed { site, areas, .. } => {
            assert_eq!(site, "ABC");
            assert_eq!(areas, &vec![2.5, 3.5]);
        }
        other => panic!("unexpected issue {:?}", other),
    }
}

#[test]
fn test_conflicting_duplicates_first_wins() {
    let df = watershed_frame(&[(Some("ABC1"), Some("2.5")), (Some("ABC2"), Some("3.5"))]);
    let config = WatershedConfig {
        conflict_policy: ConflictPolicy::FirstWins,
        ..Default::default()
    };

    let result = normalize_watershed(&df, &config).unwrap();

    assert_eq!(result.table.area("ABC"), Some(2.5));
    assert_eq!(result.issues.len(), 1);
}

#[test]
fn test_conflicting_duplicates_rejected() {
    let df = watershed_frame(&[(Some("ABC1"), Some("2.5")), (Some("ABC2"), Some("3.5"))]);
    let config = WatershedConfig {
        conflict_policy: ConflictPolicy::Reject,
        ..Default::default()
    };

    let err = normalize_watershed(&df, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::AmbiguousWatershed { ref site, first, second } if site == "ABC" && first == 2.5 && second == 3.5
    ));
}

#[test]
fn test_missing_area_column_is_an_error() {
    let df = watershed_frame(&[(Some("ABC"), Some("1.0"))]);
    let config = WatershedConfig {
        area_column: "Drainage Area".to_string(),
        ..Default::default()
    };

    let err = normalize_watershed(&df, &config).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "Drainage Area"));
}

#[test]
fn test_records_are_sorted_by_code() {
    let df = watershed_frame(&[(Some("ZED"), Some("1")), (Some("ABC"), Some("2"))]);

    let result = normalize_watershed(&df, &WatershedConfig::default()).unwrap();
    let codes: Vec<String> = result
        .table
        .records()
        .into_iter()
        .map(|record| record.site_code)
        .collect();

    assert_eq!(codes, vec!["ABC", "ZED"]);
}
