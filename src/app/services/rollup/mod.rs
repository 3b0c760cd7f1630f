//! Roll-up of EMC results over coarser analysis keys
//!
//! - [`aggregator`] - ratio-of-sums re-aggregation of a finer result table

pub mod aggregator;

#[cfg(test)]
pub mod tests;

pub use aggregator::{RollupTotals, rollup, rollup_levels};
