//! Resolving a filter selection against the dataset.

use crate::record::{Dataset, TripRecord};
use serde::Serialize;
use tracing::{debug, warn};

/// Confirmed filter values. Every present component narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<String>,
}

impl FilterSelection {
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_weekday(mut self, weekday: impl Into<String>) -> Self {
        self.weekday = Some(weekday.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.day.is_none() && self.weekday.is_none()
    }
}

/// Rows of the dataset that the current render cycle works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSubset<'a> {
    rows: Vec<&'a TripRecord>,
}

impl<'a> ResolvedSubset<'a> {
    pub fn from_records(records: &'a [TripRecord]) -> Self {
        Self {
            rows: records.iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a TripRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Applies `selection` to `dataset`, AND-ing the present components.
///
/// When no row survives, the whole dataset is returned and the flag is `true`.
pub fn resolve<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> (ResolvedSubset<'a>, bool) {
    let weekday = selection.weekday.as_deref().map(str::to_lowercase);

    let rows: Vec<&TripRecord> = dataset
        .records()
        .iter()
        .filter(|r| selection.month.is_none_or(|m| r.month == m))
        .filter(|r| selection.day.is_none_or(|d| r.day == d))
        .filter(|r| {
            weekday
                .as_deref()
                .is_none_or(|w| r.weekday.to_lowercase() == w)
        })
        .collect();

    if rows.is_empty() {
        warn!(?selection, "No data matches filters, showing full dataset");
        return (ResolvedSubset::from_records(dataset.records()), true);
    }

    debug!(?selection, rows = rows.len(), "Filters applied");
    (ResolvedSubset { rows }, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(base: &str, month: u32, day: u32, weekday: &str, trips: u64) -> TripRecord {
        TripRecord {
            dispatch_base: base.into(),
            month,
            day,
            weekday: weekday.into(),
            trips,
            ..Default::default()
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            row("A", 1, 5, "Monday", 10),
            row("B", 1, 6, "Tuesday", 20),
            row("A", 2, 1, "Monday", 5),
            row("C", 2, 5, "monday", 7),
        ])
    }

    fn trips(subset: &ResolvedSubset) -> Vec<u64> {
        subset.iter().map(|r| r.trips).collect()
    }

    #[test]
    fn test_empty_selection_returns_everything() {
        let dataset = dataset();
        let (subset, fell_back) = resolve(&dataset, &FilterSelection::default());

        assert!(!fell_back);
        assert_eq!(subset.len(), 4);
    }

    #[test]
    fn test_components_are_anded() {
        let dataset = dataset();
        let selection = FilterSelection::default().with_month(2).with_day(5);
        let (subset, fell_back) = resolve(&dataset, &selection);

        assert!(!fell_back);
        assert_eq!(trips(&subset), vec![7]);
    }

    #[test]
    fn test_weekday_is_case_insensitive() {
        let dataset = dataset();
        let selection = FilterSelection::default().with_weekday("MONDAY");
        let (subset, _) = resolve(&dataset, &selection);

        assert_eq!(trips(&subset), vec![10, 5, 7]);
    }

    #[test]
    fn test_over_constrained_falls_back_to_full_dataset() {
        let dataset = dataset();
        let selection = FilterSelection::default().with_month(1).with_weekday("Sunday");
        let (subset, fell_back) = resolve(&dataset, &selection);

        assert!(fell_back);
        assert_eq!(trips(&subset), vec![10, 20, 5, 7]);
    }

    #[test]
    fn test_result_matches_independent_predicate() {
        let dataset = dataset();
        let selections = [
            FilterSelection::default().with_month(1),
            FilterSelection::default().with_day(5),
            FilterSelection::default().with_day(5).with_weekday("monday"),
            FilterSelection::default().with_month(2).with_weekday("Monday"),
        ];

        for selection in &selections {
            let (subset, fell_back) = resolve(&dataset, selection);
            let expected: Vec<&TripRecord> = dataset
                .records()
                .iter()
                .filter(|r| {
                    selection.month.map_or(true, |m| m == r.month)
                        && selection.day.map_or(true, |d| d == r.day)
                        && selection
                            .weekday
                            .as_ref()
                            .map_or(true, |w| w.eq_ignore_ascii_case(&r.weekday))
                })
                .collect();

            assert!(!fell_back);
            assert_eq!(subset.rows(), expected.as_slice());
        }
    }
}
