use geodata::FeatureCollection;
use serde::Serialize;

use crate::precision::round_3dp;
use crate::properties::numeric_property;

/// Aggregate statistics over one feature collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_fields: u64,
    pub total_area_ha: f64,
}

/// Counts features and sums their `area_ha` property.
///
/// Features whose area is missing or not a finite number contribute 0 to
/// the total instead of failing the aggregation. Summation follows the
/// collection order, so repeated calls over the same collection yield the
/// same result. The total is rounded to 3 decimals.
pub fn summarize(collection: &FeatureCollection) -> SummaryStats {
    let mut total_area = 0.0;
    for feature in &collection.features {
        total_area += numeric_property(&feature.properties, "area_ha").unwrap_or(0.0);
    }

    SummaryStats {
        total_fields: collection.features.len() as u64,
        total_area_ha: round_3dp(total_area),
    }
}
