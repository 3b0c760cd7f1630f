//! Watershed reference table normalisation
//!
//! - [`site_code`] - suffix stripping and code corrections shared with the
//!   sample normaliser
//! - [`normalizer`] - raw table → [`WatershedTable`] lookup

pub mod normalizer;
pub mod site_code;

#[cfg(test)]
pub mod tests;

pub use normalizer::{NormalizedWatershed, WatershedTable, normalize_watershed};
pub use site_code::{normalize_site_code, strip_leading_letters, strip_trailing_digits};
