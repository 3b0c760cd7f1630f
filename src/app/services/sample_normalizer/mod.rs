//! Water-quality sample table normalisation
//!
//! Converts the raw wide sample table (one row per sample, one column per
//! constituent) into long-format [`SampleRecord`](crate::app::models::SampleRecord)s
//! joined with watershed area.
//!
//! - [`normalizer`] - the staged pipeline from raw table to long records
//! - [`timestamp`] - DATE/TIME combination and fixed-offset parsing
//! - [`units`] - constituent → unit mapping

pub mod normalizer;
pub mod timestamp;
pub mod units;

#[cfg(test)]
pub mod tests;

pub use normalizer::{
    NormalizedSamples, SampleRow, WideSamples, attach_watershed_area, drop_descriptor_columns,
    normalize_samples, parse_sample_rows, reshape_long,
};
pub use timestamp::{combine_date_time, fixed_offset, parse_timestamp};
pub use units::UnitMap;
