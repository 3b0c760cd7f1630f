//! Constituent unit assignment

use crate::app::models::Unit;
use std::collections::{BTreeMap, BTreeSet};

/// Fixed constituent → unit mapping
///
/// Names in the mg/L set map to [`Unit::MgPerL`]; every other name maps to
/// [`Unit::UgPerL`], so the mapping is total over any constituent set.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMap {
    mg_per_l: BTreeSet<String>,
}

impl UnitMap {
    pub fn new<I, S>(mg_per_l_constituents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            mg_per_l: mg_per_l_constituents
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn unit_for(&self, constituent: &str) -> Unit {
        if self.mg_per_l.contains(constituent.trim()) {
            Unit::MgPerL
        } else {
            Unit::UgPerL
        }
    }

    /// Explicit mapping over the given constituents
    pub fn resolve<'a>(
        &self,
        constituents: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, Unit> {
        constituents
            .into_iter()
            .map(|name| (name.to_string(), self.unit_for(name)))
            .collect()
    }
}
