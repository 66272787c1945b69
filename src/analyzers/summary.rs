use crate::analyzers::types::Summary;
use crate::analyzers::utility::{mean, round_to};
use crate::filter::ResolvedSubset;
use std::collections::HashSet;

/// Computes the KPI row for `subset`.
///
/// The average is rounded to one decimal, halves away from zero, and is
/// `0.0` for an empty subset.
pub fn summarize(subset: &ResolvedSubset) -> Summary {
    let trips: Vec<f64> = subset.iter().map(|r| r.trips as f64).collect();
    let unique_bases: HashSet<&str> = subset.iter().map(|r| r.dispatch_base.as_str()).collect();

    Summary {
        total_trips: subset.iter().fold(0u64, |acc, r| acc.saturating_add(r.trips)),
        total_active_vehicles: subset
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.active_vehicles)),
        unique_bases: unique_bases.len(),
        avg_trips_per_row: round_to(mean(&trips), 1),
    }
}
